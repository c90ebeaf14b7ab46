use utoipa::openapi::path::{HttpMethod, OperationBuilder, ParameterBuilder, ParameterIn, Paths};
use utoipa::openapi::request_body::RequestBodyBuilder;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::openapi::{
    ContentBuilder, ObjectBuilder, Ref, Required, ResponseBuilder, SecurityRequirement, Type,
};
use utoipa::{Modify, OpenApi};

use sitekit_core::{PaginationMeta, PaginationParams};

use crate::modules::auth::model::{AuthSession, LoginRequest, RegisterRequest, ResetPasswordRequest};
use crate::modules::email_verification::model::{
    CheckVerificationCodeDto, EmailVerificationCode, SendVerificationCodeDto, VerifiedEmail,
};
use crate::modules::resources::model::{
    CreateAboutDto, CreateCarouselDto, CreateCompanyNewDto, CreatePartnerDto, CreateProductDto,
    CreateServiceDto, CreateSettingDto, CreateTranslationDto, ResourceKind, Translatable, UpdateAboutDto,
    UpdateCarouselDto, UpdateCompanyNewDto, UpdatePartnerDto, UpdateProductDto, UpdateServiceDto,
    UpdateSettingDto, UpdateTranslationDto,
};
use crate::modules::uploads::model::UploadedFile;
use crate::modules::users::model::{
    CreateUserDto, RoleListResponse, RoleStatus, UpdateUserDto, User, UserRole,
};
use crate::utils::response::{ErrorResponse, MessageResponse};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::auth::controller::login,
        crate::modules::auth::controller::register,
        crate::modules::auth::controller::reset_password,
        crate::modules::auth::controller::logout,
        crate::modules::auth::controller::check_user_token,
        crate::modules::auth::controller::token_status,
        crate::modules::email_verification::controller::send_email_verification,
        crate::modules::email_verification::controller::check_email_verification,
        crate::modules::users::controller::index,
        crate::modules::users::controller::store,
        crate::modules::users::controller::show,
        crate::modules::users::controller::update,
        crate::modules::users::controller::destroy,
        crate::modules::users::controller::roles,
        crate::modules::uploads::controller::upload,
    ),
    components(
        schemas(
            User,
            UserRole,
            RoleStatus,
            CreateUserDto,
            UpdateUserDto,
            RoleListResponse,
            LoginRequest,
            RegisterRequest,
            ResetPasswordRequest,
            AuthSession,
            SendVerificationCodeDto,
            CheckVerificationCodeDto,
            EmailVerificationCode,
            VerifiedEmail,
            UploadedFile,
            Translatable,
            CreateAboutDto,
            UpdateAboutDto,
            CreateCarouselDto,
            UpdateCarouselDto,
            CreateCompanyNewDto,
            UpdateCompanyNewDto,
            CreatePartnerDto,
            UpdatePartnerDto,
            CreateProductDto,
            UpdateProductDto,
            CreateServiceDto,
            UpdateServiceDto,
            CreateSettingDto,
            UpdateSettingDto,
            CreateTranslationDto,
            UpdateTranslationDto,
            MessageResponse,
            ErrorResponse,
            PaginationMeta,
            PaginationParams,
        )
    ),
    modifiers(&SecurityAddon, &ContentPaths),
    tags(
        (name = "Authentication", description = "Login, registration, password reset and token checks"),
        (name = "Email verification", description = "Six-digit codes mailed to an address"),
        (name = "Users", description = "User management and role assignment"),
        (name = "Uploads", description = "File uploads for content pages"),
        (name = "Content", description = "`/api/{abouts,carousels,companies,partners,products,services,settings,translations}` \
            support index, store, show, update (PUT/PATCH) and destroy with a `{\"data\": {...}}` body"),
        (name = "Public content", description = "`/api/ui/<kind>` exposes index and show without authentication")
    ),
    info(
        title = "sitekit API",
        version = "0.1.0",
        description = "Content management API for a company website with role-based access control.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}

/// Paths of the eight content kinds. Their handlers are generic over the kind,
/// so the operations are built here instead of through `#[utoipa::path]`.
struct ContentPaths;

impl Modify for ContentPaths {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        for kind in ResourceKind::ALL {
            add_content_paths(&mut openapi.paths, kind);
        }
    }
}

fn add_content_paths(paths: &mut Paths, kind: ResourceKind) {
    let name = kind.name();
    let label = kind.label();
    let collection = format!("/api/{}", name);
    let member = format!("/api/{}/{{id}}", name);

    let guarded = |action: &str, summary: String| {
        OperationBuilder::new()
            .tag("Content")
            .operation_id(Some(format!("{}_{}", name, action)))
            .summary(Some(summary))
            .security(SecurityRequirement::new("bearer_auth", Vec::<String>::new()))
            .response("401", ResponseBuilder::new().description("Unauthenticated"))
            .response(
                "405",
                ResponseBuilder::new().description(format!("Role lacks {}.{}", name, action)),
            )
    };

    paths.add_path_operation(
        &collection,
        vec![HttpMethod::Get],
        list_params(guarded("index", format!("List {}", name)))
            .response("200", ResponseBuilder::new().description("Records with pagination meta"))
            .build(),
    );
    paths.add_path_operation(
        &collection,
        vec![HttpMethod::Post],
        guarded("store", format!("Create a {}", label))
            .request_body(Some(envelope(&format!("Create{}Dto", label))))
            .response("201", ResponseBuilder::new().description("Created record"))
            .response("422", ResponseBuilder::new().description("Validation failed"))
            .build(),
    );
    paths.add_path_operation(
        &member,
        vec![HttpMethod::Get],
        guarded("show", format!("Get a {}", label))
            .parameter(id_param())
            .response("200", ResponseBuilder::new().description("Record"))
            .response("404", ResponseBuilder::new().description("Record not found"))
            .build(),
    );
    for (method, suffix) in [(HttpMethod::Put, "put"), (HttpMethod::Patch, "patch")] {
        paths.add_path_operation(
            &member,
            vec![method],
            guarded("update", format!("Update a {}", label))
                .operation_id(Some(format!("{}_update_{}", name, suffix)))
                .parameter(id_param())
                .request_body(Some(envelope(&format!("Update{}Dto", label))))
                .response("200", ResponseBuilder::new().description("Updated record"))
                .response("404", ResponseBuilder::new().description("Record not found"))
                .response("422", ResponseBuilder::new().description("Validation failed"))
                .build(),
        );
    }
    paths.add_path_operation(
        &member,
        vec![HttpMethod::Delete],
        guarded("destroy", format!("Delete a {}", label))
            .parameter(id_param())
            .response("200", ResponseBuilder::new().description("Deleted record"))
            .response("404", ResponseBuilder::new().description("Record not found"))
            .build(),
    );

    let public = |action: &str, summary: String| {
        OperationBuilder::new()
            .tag("Public content")
            .operation_id(Some(format!("ui_{}_{}", name, action)))
            .summary(Some(summary))
    };
    paths.add_path_operation(
        format!("/api/ui/{}", name),
        vec![HttpMethod::Get],
        list_params(public("index", format!("List {} for the website", name)))
            .response("200", ResponseBuilder::new().description("Records with pagination meta"))
            .build(),
    );
    paths.add_path_operation(
        format!("/api/ui/{}/{{id}}", name),
        vec![HttpMethod::Get],
        public("show", format!("Get a {} for the website", label))
            .parameter(id_param())
            .response("200", ResponseBuilder::new().description("Record"))
            .response("404", ResponseBuilder::new().description("Record not found"))
            .build(),
    );
}

fn id_param() -> ParameterBuilder {
    ParameterBuilder::new()
        .name("id")
        .parameter_in(ParameterIn::Path)
        .required(Required::True)
        .schema(Some(ObjectBuilder::new().schema_type(Type::Integer)))
}

fn list_params(operation: OperationBuilder) -> OperationBuilder {
    let query = |name: &str, schema_type: Type| {
        ParameterBuilder::new()
            .name(name)
            .parameter_in(ParameterIn::Query)
            .required(Required::False)
            .schema(Some(ObjectBuilder::new().schema_type(schema_type)))
    };

    operation
        .parameter(query("page", Type::Integer))
        .parameter(query("limit", Type::Integer))
        .parameter(query("offset", Type::Integer))
        .parameter(query("all", Type::String).description(Some("Present to return every record")))
}

/// `{"data": <schema>}` request body.
fn envelope(schema_name: &str) -> utoipa::openapi::request_body::RequestBody {
    let body = ObjectBuilder::new()
        .property("data", Ref::from_schema_name(schema_name))
        .required("data");

    RequestBodyBuilder::new()
        .content(
            "application/json",
            ContentBuilder::new().schema(Some(body)).build(),
        )
        .required(Some(Required::True))
        .build()
}
