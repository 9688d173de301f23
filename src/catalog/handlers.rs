use super::models::{
    Brand, BusinessType, Category, NewBrand, NewBusinessType, NewCategory, NewSubCategory,
    SubCategory,
};
use crate::auth::models::AccessTokenClaims;
use crate::utils::ApiError;
use crate::utils::types::Pool;
use axum::extract::{Json, Path, State};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

pub async fn get_categories(State(pool): State<Pool>) -> Result<Json<Vec<Category>>, ApiError> {
    use axum_market::schema::categories;

    let mut conn = pool.get().await.map_err(ApiError::internal)?;

    let res = categories::table
        .filter(categories::is_active.eq(true))
        .order((categories::sort_order.asc(), categories::name.asc()))
        .select(Category::as_select())
        .load(&mut conn)
        .await?;

    Ok(Json(res))
}

pub async fn create_category(
    State(pool): State<Pool>,
    claims: AccessTokenClaims,
    Json(payload): Json<NewCategory>,
) -> Result<Json<Category>, ApiError> {
    use axum_market::schema::categories;

    claims.require_admin()?;

    let mut conn = pool.get().await.map_err(ApiError::internal)?;

    let res = diesel::insert_into(categories::table)
        .values(&payload)
        .returning(Category::as_returning())
        .get_result(&mut conn)
        .await?;

    Ok(Json(res))
}

pub async fn get_sub_categories(
    State(pool): State<Pool>,
    Path(category_id): Path<i32>,
) -> Result<Json<Vec<SubCategory>>, ApiError> {
    use axum_market::schema::sub_categories;

    let mut conn = pool.get().await.map_err(ApiError::internal)?;

    let res = sub_categories::table
        .filter(sub_categories::category_id.eq(category_id))
        .filter(sub_categories::is_active.eq(true))
        .order((sub_categories::sort_order.asc(), sub_categories::name.asc()))
        .select(SubCategory::as_select())
        .load(&mut conn)
        .await?;

    Ok(Json(res))
}

pub async fn create_sub_category(
    State(pool): State<Pool>,
    claims: AccessTokenClaims,
    Json(payload): Json<NewSubCategory>,
) -> Result<Json<SubCategory>, ApiError> {
    use axum_market::schema::sub_categories;

    claims.require_admin()?;

    let mut conn = pool.get().await.map_err(ApiError::internal)?;

    let res = diesel::insert_into(sub_categories::table)
        .values(&payload)
        .returning(SubCategory::as_returning())
        .get_result(&mut conn)
        .await?;

    Ok(Json(res))
}

pub async fn get_brands(State(pool): State<Pool>) -> Result<Json<Vec<Brand>>, ApiError> {
    use axum_market::schema::brands;

    let mut conn = pool.get().await.map_err(ApiError::internal)?;

    let res = brands::table
        .filter(brands::is_active.eq(true))
        .order(brands::name.asc())
        .select(Brand::as_select())
        .load(&mut conn)
        .await?;

    Ok(Json(res))
}

pub async fn create_brand(
    State(pool): State<Pool>,
    claims: AccessTokenClaims,
    Json(payload): Json<NewBrand>,
) -> Result<Json<Brand>, ApiError> {
    use axum_market::schema::brands;

    claims.require_admin()?;

    let mut conn = pool.get().await.map_err(ApiError::internal)?;

    let res = diesel::insert_into(brands::table)
        .values(&payload)
        .returning(Brand::as_returning())
        .get_result(&mut conn)
        .await?;

    Ok(Json(res))
}

pub async fn get_business_types(
    State(pool): State<Pool>,
) -> Result<Json<Vec<BusinessType>>, ApiError> {
    use axum_market::schema::business_types;

    let mut conn = pool.get().await.map_err(ApiError::internal)?;

    let res = business_types::table
        .filter(business_types::is_active.eq(true))
        .order(business_types::name.asc())
        .select(BusinessType::as_select())
        .load(&mut conn)
        .await?;

    Ok(Json(res))
}

pub async fn create_business_type(
    State(pool): State<Pool>,
    claims: AccessTokenClaims,
    Json(payload): Json<NewBusinessType>,
) -> Result<Json<BusinessType>, ApiError> {
    use axum_market::schema::business_types;

    claims.require_admin()?;

    let mut conn = pool.get().await.map_err(ApiError::internal)?;

    let res = diesel::insert_into(business_types::table)
        .values(&payload)
        .returning(BusinessType::as_returning())
        .get_result(&mut conn)
        .await?;

    Ok(Json(res))
}
