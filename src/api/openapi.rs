//! OpenAPI documentation configuration.
//!
//! Served through Swagger UI in debug mode.

use utoipa::OpenApi;

use crate::api::handlers::user_handler;
use crate::domain::UserResponse;

/// OpenAPI documentation for the user API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "apiserver",
        description = "User management API. Every JSON response is wrapped in `{code, message, data}`.",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:9090", description = "Local development server")
    ),
    paths(
        user_handler::create_user,
        user_handler::list_users,
        user_handler::get_user,
        user_handler::update_user,
        user_handler::delete_user,
    ),
    components(
        schemas(
            UserResponse,
            user_handler::CreateUserRequest,
            user_handler::CreateUserResponse,
            user_handler::ListUsersResponse,
        )
    ),
    tags(
        (name = "user", description = "User management operations")
    )
)]
pub struct ApiDoc;
