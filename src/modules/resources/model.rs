use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use sitekit_core::PaginationParams;

/// Validated attribute object of a content record.
pub type Attributes = serde_json::Map<String, Value>;

/// The content resource kinds managed through the generic CRUD endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ResourceKind {
    About,
    Carousel,
    CompanyNew,
    Partner,
    Product,
    Service,
    Setting,
    Translation,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 8] = [
        ResourceKind::About,
        ResourceKind::Carousel,
        ResourceKind::CompanyNew,
        ResourceKind::Partner,
        ResourceKind::Product,
        ResourceKind::Service,
        ResourceKind::Setting,
        ResourceKind::Translation,
    ];

    /// Route segment, RBAC resource name and table name.
    pub fn name(self) -> &'static str {
        match self {
            ResourceKind::About => "abouts",
            ResourceKind::Carousel => "carousels",
            ResourceKind::CompanyNew => "companies",
            ResourceKind::Partner => "partners",
            ResourceKind::Product => "products",
            ResourceKind::Service => "services",
            ResourceKind::Setting => "settings",
            ResourceKind::Translation => "translations",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ResourceKind::About => "About",
            ResourceKind::Carousel => "Carousel",
            ResourceKind::CompanyNew => "CompanyNew",
            ResourceKind::Partner => "Partner",
            ResourceKind::Product => "Product",
            ResourceKind::Service => "Service",
            ResourceKind::Setting => "Setting",
            ResourceKind::Translation => "Translation",
        }
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A stored content record, serialized flat:
/// `{"id": 1, "title": {...}, "created_at": "...", "updated_at": "..."}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResourceRecord {
    pub id: i64,
    #[serde(flatten)]
    pub attributes: Attributes,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Ties a resource kind to its create and update payloads.
pub trait ResourceSchema: Send + Sync + 'static {
    const KIND: ResourceKind;

    type Create: DeserializeOwned + Serialize + Validate + Send + std::fmt::Debug + 'static;
    type Update: DeserializeOwned + Serialize + Validate + Send + std::fmt::Debug + 'static;
}

/// Per-locale text, e.g. `{"uz": "...", "ru": "...", "en": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct Translatable(pub BTreeMap<String, String>);

pub fn validate_translatable(value: &Translatable) -> Result<(), ValidationError> {
    if value.0.is_empty() {
        return Err(ValidationError::new("translatable")
            .with_message("at least one locale is required".into()));
    }
    if value
        .0
        .iter()
        .any(|(locale, text)| locale.trim().is_empty() || text.trim().is_empty())
    {
        return Err(ValidationError::new("translatable")
            .with_message("locales and texts must not be empty".into()));
    }
    Ok(())
}

/// Query string of the list endpoints. `?all` (any value) disables pagination.
#[derive(Debug, Clone, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListParams {
    /// Present to return every record without pagination.
    pub all: Option<String>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

impl ListParams {
    pub fn return_all(&self) -> bool {
        self.all.is_some()
    }
}

pub struct About;
pub struct Carousel;
pub struct CompanyNew;
pub struct Partner;
pub struct Product;
pub struct Service;
pub struct Setting;
pub struct Translation;

#[derive(Debug, Deserialize, Serialize, Validate, ToSchema)]
pub struct CreateAboutDto {
    #[validate(custom(function = "validate_translatable"))]
    pub title: Translatable,
    #[validate(custom(function = "validate_translatable"))]
    pub description: Translatable,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 255))]
    pub photo: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Validate, ToSchema)]
pub struct UpdateAboutDto {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_translatable"))]
    pub title: Option<Translatable>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_translatable"))]
    pub description: Option<Translatable>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 255))]
    pub photo: Option<String>,
}

impl ResourceSchema for About {
    const KIND: ResourceKind = ResourceKind::About;
    type Create = CreateAboutDto;
    type Update = UpdateAboutDto;
}

#[derive(Debug, Deserialize, Serialize, Validate, ToSchema)]
pub struct CreateCarouselDto {
    #[validate(custom(function = "validate_translatable"))]
    pub title: Translatable,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_translatable"))]
    pub subtitle: Option<Translatable>,
    #[validate(length(min = 1, max = 255))]
    pub photo: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(url)]
    pub link: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Validate, ToSchema)]
pub struct UpdateCarouselDto {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_translatable"))]
    pub title: Option<Translatable>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_translatable"))]
    pub subtitle: Option<Translatable>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 255))]
    pub photo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(url)]
    pub link: Option<String>,
}

impl ResourceSchema for Carousel {
    const KIND: ResourceKind = ResourceKind::Carousel;
    type Create = CreateCarouselDto;
    type Update = UpdateCarouselDto;
}

#[derive(Debug, Deserialize, Serialize, Validate, ToSchema)]
pub struct CreateCompanyNewDto {
    #[validate(custom(function = "validate_translatable"))]
    pub title: Translatable,
    #[validate(custom(function = "validate_translatable"))]
    pub description: Translatable,
    #[validate(length(min = 1, max = 255))]
    pub date: String,
    #[validate(length(min = 1, max = 255))]
    pub photo: String,
}

#[derive(Debug, Deserialize, Serialize, Validate, ToSchema)]
pub struct UpdateCompanyNewDto {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_translatable"))]
    pub title: Option<Translatable>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_translatable"))]
    pub description: Option<Translatable>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 255))]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 255))]
    pub photo: Option<String>,
}

impl ResourceSchema for CompanyNew {
    const KIND: ResourceKind = ResourceKind::CompanyNew;
    type Create = CreateCompanyNewDto;
    type Update = UpdateCompanyNewDto;
}

#[derive(Debug, Deserialize, Serialize, Validate, ToSchema)]
pub struct CreatePartnerDto {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(length(min = 1, max = 255))]
    pub logo: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(url)]
    pub link: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Validate, ToSchema)]
pub struct UpdatePartnerDto {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 255))]
    pub logo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(url)]
    pub link: Option<String>,
}

impl ResourceSchema for Partner {
    const KIND: ResourceKind = ResourceKind::Partner;
    type Create = CreatePartnerDto;
    type Update = UpdatePartnerDto;
}

#[derive(Debug, Deserialize, Serialize, Validate, ToSchema)]
pub struct CreateProductDto {
    #[validate(custom(function = "validate_translatable"))]
    pub title: Translatable,
    #[validate(custom(function = "validate_translatable"))]
    pub description: Translatable,
    #[validate(length(min = 1, max = 255))]
    pub photo: String,
}

#[derive(Debug, Deserialize, Serialize, Validate, ToSchema)]
pub struct UpdateProductDto {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_translatable"))]
    pub title: Option<Translatable>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_translatable"))]
    pub description: Option<Translatable>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 255))]
    pub photo: Option<String>,
}

impl ResourceSchema for Product {
    const KIND: ResourceKind = ResourceKind::Product;
    type Create = CreateProductDto;
    type Update = UpdateProductDto;
}

#[derive(Debug, Deserialize, Serialize, Validate, ToSchema)]
pub struct CreateServiceDto {
    #[validate(custom(function = "validate_translatable"))]
    pub title: Translatable,
    #[validate(custom(function = "validate_translatable"))]
    pub description: Translatable,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 255))]
    pub icon: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Validate, ToSchema)]
pub struct UpdateServiceDto {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_translatable"))]
    pub title: Option<Translatable>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_translatable"))]
    pub description: Option<Translatable>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 255))]
    pub icon: Option<String>,
}

impl ResourceSchema for Service {
    const KIND: ResourceKind = ResourceKind::Service;
    type Create = CreateServiceDto;
    type Update = UpdateServiceDto;
}

#[derive(Debug, Deserialize, Serialize, Validate, ToSchema)]
pub struct CreateSettingDto {
    #[validate(length(min = 1, max = 255))]
    pub key: String,
    #[validate(length(min = 1))]
    pub value: String,
}

#[derive(Debug, Deserialize, Serialize, Validate, ToSchema)]
pub struct UpdateSettingDto {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 255))]
    pub key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1))]
    pub value: Option<String>,
}

impl ResourceSchema for Setting {
    const KIND: ResourceKind = ResourceKind::Setting;
    type Create = CreateSettingDto;
    type Update = UpdateSettingDto;
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
pub struct CreateTranslationDto {
    #[validate(length(min = 1, max = 255))]
    pub key: String,
    #[validate(length(min = 1))]
    pub uz: String,
    #[validate(length(min = 1))]
    pub ru: String,
    #[validate(length(min = 1))]
    pub en: String,
}

#[derive(Debug, Deserialize, Serialize, Validate, ToSchema)]
pub struct UpdateTranslationDto {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 255))]
    pub key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1))]
    pub uz: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1))]
    pub ru: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1))]
    pub en: Option<String>,
}

impl ResourceSchema for Translation {
    const KIND: ResourceKind = ResourceKind::Translation;
    type Create = CreateTranslationDto;
    type Update = UpdateTranslationDto;
}
