use crate::domain::types::{CategoryId, Locale};
use crate::dto::categories::CategoryDto;
use crate::forms::categories::CategoryFormPayload;
use crate::repository::{CategoryListQuery, CategoryReader, CategoryWriter};

use super::{ServiceError, ServiceResult};

pub fn list_categories<R>(locale: &Locale, repo: &R) -> ServiceResult<Vec<CategoryDto>>
where
    R: CategoryReader,
{
    match repo.list_categories(CategoryListQuery::new()) {
        Ok(categories) => Ok(categories
            .iter()
            .map(|category| CategoryDto::new(category, locale))
            .collect()),
        Err(e) => {
            log::error!("Failed to list categories: {e}");
            Err(ServiceError::Internal)
        }
    }
}

pub fn get_category<R>(id: CategoryId, locale: &Locale, repo: &R) -> ServiceResult<CategoryDto>
where
    R: CategoryReader,
{
    match repo.get_category_by_id(id) {
        Ok(Some(category)) => Ok(CategoryDto::new(&category, locale)),
        Ok(None) => Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to get category: {e}");
            Err(ServiceError::Internal)
        }
    }
}

pub fn create_category<R>(
    payload: CategoryFormPayload,
    locale: &Locale,
    repo: &R,
) -> ServiceResult<CategoryDto>
where
    R: CategoryReader + CategoryWriter,
{
    let category = payload.into_new_category(locale)?;

    match repo.get_category_by_technical_name(&category.technical_name) {
        Ok(None) => {}
        Ok(Some(_)) => {
            return Err(ServiceError::Conflict(format!(
                "category `{}` already exists",
                category.technical_name
            )));
        }
        Err(e) => return Err(ServiceError::from_repository("look up category", e)),
    }

    match repo.create_category(&category) {
        Ok(created) => {
            log::info!("Created cookie category `{}`", created.technical_name);
            Ok(CategoryDto::new(&created, locale))
        }
        Err(e) => Err(ServiceError::from_repository("create category", e)),
    }
}

pub fn update_category<R>(
    id: CategoryId,
    payload: CategoryFormPayload,
    locale: &Locale,
    repo: &R,
) -> ServiceResult<CategoryDto>
where
    R: CategoryReader + CategoryWriter,
{
    let mut category = match repo.get_category_by_id(id) {
        Ok(Some(category)) => category,
        Ok(None) => return Err(ServiceError::NotFound),
        Err(e) => return Err(ServiceError::from_repository("get category", e)),
    };

    if let Some(technical_name) = &payload.technical_name {
        match repo.get_category_by_technical_name(technical_name) {
            Ok(Some(other)) if other.id != id => {
                return Err(ServiceError::Conflict(format!(
                    "category `{technical_name}` already exists"
                )));
            }
            Ok(_) => {}
            Err(e) => return Err(ServiceError::from_repository("look up category", e)),
        }
    }

    payload.apply_to(&mut category, locale);

    match repo.update_category(&category) {
        Ok(updated) => Ok(CategoryDto::new(&updated, locale)),
        Err(e) => Err(ServiceError::from_repository("update category", e)),
    }
}

/// Delete a category with all of its cookies.
pub fn delete_category<R>(id: CategoryId, repo: &R) -> ServiceResult<()>
where
    R: CategoryReader + CategoryWriter,
{
    match repo.get_category_by_id(id) {
        Ok(Some(_)) => {}
        Ok(None) => return Err(ServiceError::NotFound),
        Err(e) => return Err(ServiceError::from_repository("get category", e)),
    }

    match repo.delete_category(id) {
        Ok(_) => Ok(()),
        Err(e) => Err(ServiceError::from_repository("delete category", e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::category::Category;
    use crate::domain::translation::Translations;
    use crate::domain::types::TechnicalName;
    use crate::repository::test::TestRepository;

    fn de() -> Locale {
        Locale::new("de").unwrap()
    }

    fn sample_category(id: i32, technical_name: &str, position: i32) -> Category {
        Category {
            id: CategoryId::new(id).unwrap(),
            technical_name: TechnicalName::new(technical_name).unwrap(),
            enabled: false,
            read_only: false,
            position,
            active: true,
            translations: Translations::new(),
        }
    }

    #[test]
    fn list_categories_is_ordered_by_position() {
        let repo = TestRepository::new(
            vec![
                sample_category(1, "marketing", 3),
                sample_category(2, "essential", 0),
            ],
            vec![],
        );

        let categories = list_categories(&de(), &repo).unwrap();

        let names: Vec<&str> = categories
            .iter()
            .map(|c| c.technical_name.as_str())
            .collect();
        assert_eq!(names, vec!["essential", "marketing"]);
    }

    #[test]
    fn create_category_rejects_duplicate_technical_name() {
        let repo = TestRepository::new(vec![sample_category(1, "essential", 0)], vec![]);
        let payload = CategoryFormPayload {
            technical_name: Some(TechnicalName::new("essential").unwrap()),
            ..CategoryFormPayload::default()
        };

        let err = create_category(payload, &de(), &repo).unwrap_err();

        assert!(matches!(err, ServiceError::Conflict(_)));
        assert_eq!(repo.categories().len(), 1);
    }

    #[test]
    fn create_category_writes_texts_for_locale() {
        let repo = TestRepository::default();
        let payload = CategoryFormPayload {
            technical_name: Some(TechnicalName::new("functional").unwrap()),
            name: Some("Funktional".into()),
            ..CategoryFormPayload::default()
        };

        let created = create_category(payload, &de(), &repo).unwrap();

        assert_eq!(created.name.as_deref(), Some("Funktional"));
        let en = get_category(
            CategoryId::new(created.id).unwrap(),
            &Locale::new("en").unwrap(),
            &repo,
        )
        .unwrap();
        assert_eq!(en.name, None);
    }

    #[test]
    fn update_category_returns_not_found_for_unknown_id() {
        let repo = TestRepository::default();

        let err = update_category(
            CategoryId::new(9).unwrap(),
            CategoryFormPayload::default(),
            &de(),
            &repo,
        )
        .unwrap_err();

        assert_eq!(err, ServiceError::NotFound);
    }

    #[test]
    fn update_category_rejects_taken_technical_name() {
        let repo = TestRepository::new(
            vec![
                sample_category(1, "essential", 0),
                sample_category(2, "analytics", 1),
            ],
            vec![],
        );
        let payload = CategoryFormPayload {
            technical_name: Some(TechnicalName::new("essential").unwrap()),
            ..CategoryFormPayload::default()
        };

        let err = update_category(CategoryId::new(2).unwrap(), payload, &de(), &repo).unwrap_err();

        assert!(matches!(err, ServiceError::Conflict(_)));
    }

    #[test]
    fn delete_category_removes_it() {
        let repo = TestRepository::new(vec![sample_category(1, "essential", 0)], vec![]);

        delete_category(CategoryId::new(1).unwrap(), &repo).unwrap();

        assert!(repo.categories().is_empty());
        assert_eq!(
            delete_category(CategoryId::new(1).unwrap(), &repo),
            Err(ServiceError::NotFound)
        );
    }
}
