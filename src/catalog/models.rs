use axum_market::schema::{brands, business_types, categories, sub_categories};
use bigdecimal::BigDecimal;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Queryable, Selectable, Debug, PartialEq, Identifiable, Serialize)]
#[diesel(table_name = categories)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Category {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub icon: Option<String>,
    pub sort_order: i32,
    pub is_active: bool,
}

#[derive(Insertable, Deserialize)]
#[diesel(table_name = categories)]
pub struct NewCategory {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub icon: Option<String>,
    #[serde(default)]
    pub sort_order: i32,
}

#[derive(Queryable, Selectable, Debug, PartialEq, Identifiable, Associations, Serialize)]
#[diesel(belongs_to(Category))]
#[diesel(table_name = sub_categories)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct SubCategory {
    pub id: i32,
    pub category_id: i32,
    pub name: String,
    pub description: String,
    pub sort_order: i32,
    pub is_active: bool,
}

#[derive(Insertable, Deserialize)]
#[diesel(table_name = sub_categories)]
pub struct NewSubCategory {
    pub category_id: i32,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub sort_order: i32,
}

#[derive(Queryable, Selectable, Debug, PartialEq, Identifiable, Serialize)]
#[diesel(table_name = brands)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Brand {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub is_active: bool,
}

#[derive(Insertable, Deserialize)]
#[diesel(table_name = brands)]
pub struct NewBrand {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Queryable, Selectable, Debug, PartialEq, Identifiable, Serialize)]
#[diesel(table_name = business_types)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct BusinessType {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub min_order_amount: Option<BigDecimal>,
    pub is_active: bool,
}

#[derive(Insertable, Deserialize)]
#[diesel(table_name = business_types)]
pub struct NewBusinessType {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub min_order_amount: Option<BigDecimal>,
}
