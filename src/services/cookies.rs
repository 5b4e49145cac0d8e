use std::collections::HashMap;

use crate::domain::category::Category;
use crate::domain::cookie::Cookie;
use crate::domain::types::{CategoryId, CookieId, Locale};
use crate::dto::cookies::CookieDto;
use crate::forms::cookies::CookieFormPayload;
use crate::repository::{
    CategoryListQuery, CategoryReader, CookieListQuery, CookieReader, CookieWriter,
};

use super::{ServiceError, ServiceResult};

fn cookie_dto<R>(cookie: &Cookie, locale: &Locale, repo: &R) -> ServiceResult<CookieDto>
where
    R: CategoryReader,
{
    match repo.get_category_by_id(cookie.category_id) {
        Ok(category) => Ok(CookieDto::new(cookie, category.as_ref(), locale)),
        Err(e) => Err(ServiceError::from_repository("get category", e)),
    }
}

fn require_category<R>(id: CategoryId, repo: &R) -> ServiceResult<Category>
where
    R: CategoryReader,
{
    match repo.get_category_by_id(id) {
        Ok(Some(category)) => Ok(category),
        Ok(None) => Err(ServiceError::Validation(format!(
            "category {id} does not exist"
        ))),
        Err(e) => Err(ServiceError::from_repository("get category", e)),
    }
}

/// List cookies, optionally restricted to one category.
pub fn list_cookies<R>(
    category_id: Option<CategoryId>,
    locale: &Locale,
    repo: &R,
) -> ServiceResult<Vec<CookieDto>>
where
    R: CategoryReader + CookieReader,
{
    let categories: HashMap<CategoryId, Category> =
        match repo.list_categories(CategoryListQuery::new()) {
            Ok(categories) => categories.into_iter().map(|c| (c.id, c)).collect(),
            Err(e) => {
                log::error!("Failed to list categories: {e}");
                return Err(ServiceError::Internal);
            }
        };

    let mut query = CookieListQuery::new();
    if let Some(category_id) = category_id {
        query = query.category(category_id);
    }

    match repo.list_cookies(query) {
        Ok(cookies) => Ok(cookies
            .iter()
            .map(|cookie| CookieDto::new(cookie, categories.get(&cookie.category_id), locale))
            .collect()),
        Err(e) => {
            log::error!("Failed to list cookies: {e}");
            Err(ServiceError::Internal)
        }
    }
}

pub fn get_cookie<R>(id: CookieId, locale: &Locale, repo: &R) -> ServiceResult<CookieDto>
where
    R: CategoryReader + CookieReader,
{
    match repo.get_cookie_by_id(id) {
        Ok(Some(cookie)) => cookie_dto(&cookie, locale, repo),
        Ok(None) => Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to get cookie: {e}");
            Err(ServiceError::Internal)
        }
    }
}

pub fn create_cookie<R>(
    payload: CookieFormPayload,
    locale: &Locale,
    repo: &R,
) -> ServiceResult<CookieDto>
where
    R: CategoryReader + CookieReader + CookieWriter,
{
    let cookie = payload.into_new_cookie(locale)?;
    let category = require_category(cookie.category_id, repo)?;

    match repo.get_cookie_by_technical_name(&cookie.technical_name) {
        Ok(None) => {}
        Ok(Some(_)) => {
            return Err(ServiceError::Conflict(format!(
                "cookie `{}` already exists",
                cookie.technical_name
            )));
        }
        Err(e) => return Err(ServiceError::from_repository("look up cookie", e)),
    }

    match repo.create_cookie(&cookie) {
        Ok(created) => {
            log::info!(
                "Created cookie `{}` in category `{}`",
                created.technical_name,
                category.technical_name
            );
            Ok(CookieDto::new(&created, Some(&category), locale))
        }
        Err(e) => Err(ServiceError::from_repository("create cookie", e)),
    }
}

/// Patch a cookie; a submitted `cookieItems` list replaces the attached items.
pub fn update_cookie<R>(
    id: CookieId,
    payload: CookieFormPayload,
    locale: &Locale,
    repo: &R,
) -> ServiceResult<CookieDto>
where
    R: CategoryReader + CookieReader + CookieWriter,
{
    let mut cookie = match repo.get_cookie_by_id(id) {
        Ok(Some(cookie)) => cookie,
        Ok(None) => return Err(ServiceError::NotFound),
        Err(e) => return Err(ServiceError::from_repository("get cookie", e)),
    };

    if let Some(category_id) = payload.category_id {
        require_category(category_id, repo)?;
    }
    if let Some(technical_name) = &payload.technical_name {
        match repo.get_cookie_by_technical_name(technical_name) {
            Ok(Some(other)) if other.id != id => {
                return Err(ServiceError::Conflict(format!(
                    "cookie `{technical_name}` already exists"
                )));
            }
            Ok(_) => {}
            Err(e) => return Err(ServiceError::from_repository("look up cookie", e)),
        }
    }

    if let Some(sync) = payload.apply_to(&mut cookie, locale)? {
        log::debug!(
            "Cookie `{}` items: {} created, {} updated, {} removed",
            cookie.technical_name,
            sync.created,
            sync.updated,
            sync.removed
        );
    }

    match repo.update_cookie(&cookie) {
        Ok(updated) => cookie_dto(&updated, locale, repo),
        Err(e) => Err(ServiceError::from_repository("update cookie", e)),
    }
}

pub fn delete_cookie<R>(id: CookieId, repo: &R) -> ServiceResult<()>
where
    R: CookieReader + CookieWriter,
{
    match repo.get_cookie_by_id(id) {
        Ok(Some(_)) => {}
        Ok(None) => return Err(ServiceError::NotFound),
        Err(e) => return Err(ServiceError::from_repository("get cookie", e)),
    }

    match repo.delete_cookie(id) {
        Ok(_) => Ok(()),
        Err(e) => Err(ServiceError::from_repository("delete cookie", e)),
    }
}
