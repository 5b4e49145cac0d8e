use std::collections::HashMap;

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::domain::types::{CategoryId, Locale};
use crate::dto::consent::{ConsentConfigDto, PublicCategoryDto, PublicCookieDto};
use crate::models::config::BannerSettings;
use crate::repository::{CategoryListQuery, CategoryReader, CookieListQuery, CookieReader};

use super::{ServiceError, ServiceResult};

/// Number of hex characters kept from the content hash.
const REVISION_LEN: usize = 8;

#[derive(Serialize)]
struct RevisionInput<'a> {
    categories: &'a [PublicCategoryDto],
    cookies: &'a [PublicCookieDto],
}

/// Fingerprint of the serialized categories and cookies.
pub fn compute_revision(
    categories: &[PublicCategoryDto],
    cookies: &[PublicCookieDto],
) -> ServiceResult<String> {
    let json = serde_json::to_vec(&RevisionInput {
        categories,
        cookies,
    })
    .map_err(|e| {
        log::error!("Failed to serialize consent config: {e}");
        ServiceError::Internal
    })?;

    let digest = Sha256::digest(&json);
    let mut revision = hex::encode(digest);
    revision.truncate(REVISION_LEN);
    Ok(revision)
}

/// Assemble the public consent document for `locale`.
///
/// Only active categories and active cookies of active categories are
/// listed; inactive items are dropped from each cookie.
pub fn get_full_config<R>(
    locale: &Locale,
    banner: &BannerSettings,
    repo: &R,
) -> ServiceResult<ConsentConfigDto>
where
    R: CategoryReader + CookieReader,
{
    let categories = match repo.list_categories(CategoryListQuery::new().active_only()) {
        Ok(categories) => categories,
        Err(e) => {
            log::error!("Failed to list categories: {e}");
            return Err(ServiceError::Internal);
        }
    };
    let cookies = match repo.list_cookies(CookieListQuery::new().active_only()) {
        Ok(cookies) => cookies,
        Err(e) => {
            log::error!("Failed to list cookies: {e}");
            return Err(ServiceError::Internal);
        }
    };

    let technical_names: HashMap<CategoryId, &str> = categories
        .iter()
        .map(|category| (category.id, category.technical_name.as_str()))
        .collect();

    let public_categories: Vec<PublicCategoryDto> = categories
        .iter()
        .map(|category| PublicCategoryDto::new(category, locale))
        .collect();
    let public_cookies: Vec<PublicCookieDto> = cookies
        .iter()
        .filter_map(|cookie| {
            technical_names
                .get(&cookie.category_id)
                .map(|name| PublicCookieDto::new(cookie, name, locale))
        })
        .collect();

    let revision = compute_revision(&public_categories, &public_cookies)?;

    Ok(ConsentConfigDto {
        config: banner.clone(),
        categories: public_categories,
        cookies: public_cookies,
        revision,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::category::Category;
    use crate::domain::cookie::{Cookie, CookieItem};
    use crate::domain::translation::Translations;
    use crate::domain::types::{
        CookieId, CookieItemId, CookieItemName, LegalBasis, ProcessingLocation, TechnicalName,
    };
    use crate::repository::CookieWriter;
    use crate::repository::test::TestRepository;

    fn de() -> Locale {
        Locale::new("de").unwrap()
    }

    fn category(id: i32, name: &str, position: i32, active: bool) -> Category {
        Category {
            id: CategoryId::new(id).unwrap(),
            technical_name: TechnicalName::new(name).unwrap(),
            enabled: false,
            read_only: false,
            position,
            active,
            translations: Translations::new(),
        }
    }

    fn cookie(id: i32, category_id: i32, name: &str, position: i32) -> Cookie {
        Cookie {
            id: CookieId::new(id).unwrap(),
            category_id: CategoryId::new(category_id).unwrap(),
            technical_name: TechnicalName::new(name).unwrap(),
            provider: None,
            script_url: None,
            legal_basis: LegalBasis::Consent,
            processing_location: ProcessingLocation::Eu,
            position,
            active: true,
            translations: Translations::new(),
            items: Vec::new(),
        }
    }

    fn item(id: i32, name: &str, active: bool) -> CookieItem {
        CookieItem {
            id: Some(CookieItemId::new(id).unwrap()),
            active,
            ..CookieItem::new(CookieItemName::new(name).unwrap())
        }
    }

    fn sample_repo() -> TestRepository {
        let mut ga = cookie(10, 2, "ga", 0);
        ga.items = vec![item(20, "_ga", true), item(21, "_gid", false)];
        TestRepository::new(
            vec![
                category(1, "essential", 0, true),
                category(2, "analytics", 1, true),
                category(3, "marketing", 2, false),
            ],
            vec![
                ga,
                cookie(11, 1, "session", 0),
                cookie(12, 3, "facebook-pixel", 0),
            ],
        )
    }

    #[test]
    fn lists_only_active_records_in_order() {
        let repo = sample_repo();

        let config = get_full_config(&de(), &BannerSettings::default(), &repo).unwrap();

        let categories: Vec<&str> = config
            .categories
            .iter()
            .map(|c| c.technical_name.as_str())
            .collect();
        assert_eq!(categories, vec!["essential", "analytics"]);
        let cookies: Vec<&str> = config
            .cookies
            .iter()
            .map(|c| c.technical_name.as_str())
            .collect();
        assert_eq!(cookies, vec!["session", "ga"]);
        assert_eq!(config.cookies[1].category_technical_name, "analytics");
        assert_eq!(config.cookies[1].cookie_items.len(), 1);
        assert_eq!(config.revision.len(), 8);
    }

    #[test]
    fn revision_is_stable_without_writes() {
        let repo = sample_repo();

        let first = get_full_config(&de(), &BannerSettings::default(), &repo).unwrap();
        let second = get_full_config(&de(), &BannerSettings::default(), &repo).unwrap();

        assert_eq!(first.revision, second.revision);
    }

    #[test]
    fn revision_ignores_inactive_changes_and_tracks_active_ones() {
        let repo = sample_repo();
        let before = get_full_config(&de(), &BannerSettings::default(), &repo)
            .unwrap()
            .revision;

        let mut hidden = repo
            .cookies()
            .into_iter()
            .find(|c| c.technical_name == "facebook-pixel")
            .unwrap();
        hidden.provider = Some("Meta".into());
        repo.update_cookie(&hidden).unwrap();
        let after_inactive = get_full_config(&de(), &BannerSettings::default(), &repo)
            .unwrap()
            .revision;
        assert_eq!(before, after_inactive);

        let mut visible = repo
            .cookies()
            .into_iter()
            .find(|c| c.technical_name == "ga")
            .unwrap();
        visible.provider = Some("Google".into());
        repo.update_cookie(&visible).unwrap();
        let after_active = get_full_config(&de(), &BannerSettings::default(), &repo)
            .unwrap()
            .revision;
        assert_ne!(before, after_active);
    }
}
