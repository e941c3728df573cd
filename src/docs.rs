use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::accounts::controller::login,
        crate::modules::accounts::controller::get_accounts,
        crate::modules::accounts::controller::get_profile,
        crate::modules::accounts::controller::change_password,
        crate::modules::accounts::controller::get_account,
        crate::modules::accounts::controller::create_account,
        crate::modules::accounts::controller::update_account,
        crate::modules::accounts::controller::delete_account,
        crate::modules::roles::controller::get_roles,
        crate::modules::roles::controller::get_role,
        crate::modules::roles::controller::create_role,
        crate::modules::roles::controller::update_role,
        crate::modules::roles::controller::delete_role,
        crate::modules::roles::controller::get_permissions,
        crate::modules::roles::controller::get_permission,
        crate::modules::roles::controller::create_permission,
        crate::modules::roles::controller::update_permission,
        crate::modules::roles::controller::delete_permission,
        crate::modules::roles::controller::assign_permissions,
        crate::modules::roles::controller::get_assigned_permissions,
        crate::modules::departments::controller::get_departments,
        crate::modules::departments::controller::get_department,
        crate::modules::departments::controller::create_department,
        crate::modules::departments::controller::update_department,
        crate::modules::departments::controller::delete_department,
        crate::modules::classes::controller::get_classes,
        crate::modules::classes::controller::get_class,
        crate::modules::classes::controller::create_class,
        crate::modules::classes::controller::update_class,
        crate::modules::classes::controller::delete_class,
        crate::modules::classes::controller::export_students,
        crate::modules::students::controller::get_students,
        crate::modules::students::controller::get_student,
        crate::modules::students::controller::create_student,
        crate::modules::students::controller::update_student,
        crate::modules::students::controller::delete_student,
        crate::modules::teachers::controller::get_teachers,
        crate::modules::teachers::controller::get_teacher,
        crate::modules::teachers::controller::create_teacher,
        crate::modules::teachers::controller::update_teacher,
        crate::modules::teachers::controller::delete_teacher,
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Accounts", description = "Account management and authentication"),
        (name = "Roles", description = "Role management"),
        (name = "Permissions", description = "Permission catalog and role assignment"),
        (name = "Departments", description = "Department management"),
        (name = "Classes", description = "Class management and roster export"),
        (name = "Students", description = "Student management"),
        (name = "Teachers", description = "Teacher management")
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
            );
        }
    }
}
