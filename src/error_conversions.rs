//! Error conversion glue between layers.
//!
//! The domain layer must not depend on service/repository error types, so the
//! conversions live here and are compiled per feature.

use crate::domain::types::TypeConstraintError;
use crate::repository::RepositoryError;

impl From<TypeConstraintError> for RepositoryError {
    fn from(val: TypeConstraintError) -> Self {
        RepositoryError::ValidationError(val.to_string())
    }
}

#[cfg(feature = "server")]
mod server {
    use crate::domain::types::TypeConstraintError;
    use crate::forms::categories::CategoryFormError;
    use crate::forms::cookies::CookieFormError;
    use crate::forms::import_export::ImportError;
    use crate::services::ServiceError;

    impl From<TypeConstraintError> for ServiceError {
        fn from(val: TypeConstraintError) -> Self {
            ServiceError::Validation(val.to_string())
        }
    }

    impl From<CategoryFormError> for ServiceError {
        fn from(val: CategoryFormError) -> Self {
            ServiceError::Form(val.to_string())
        }
    }

    impl From<CookieFormError> for ServiceError {
        fn from(val: CookieFormError) -> Self {
            ServiceError::Form(val.to_string())
        }
    }

    impl From<ImportError> for ServiceError {
        fn from(val: ImportError) -> Self {
            ServiceError::Validation(val.to_string())
        }
    }
}
