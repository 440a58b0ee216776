//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{auth, drivers, gates, health, monitor, slots, stats};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Yardgate API",
        version = "0.3.0",
        description = "Warehouse gate and dock check-in REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Auth
        auth::login,
        auth::me,
        // Slots
        slots::available_slots,
        // Drivers
        drivers::list_drivers,
        drivers::get_driver,
        drivers::create_booking,
        drivers::find_booking,
        drivers::search_booking,
        drivers::create_arrival,
        drivers::confirm_arrival,
        drivers::verify_driver,
        drivers::reject_driver,
        drivers::call_driver,
        drivers::recall_driver,
        drivers::start_loading,
        drivers::complete_visit,
        // Gates
        gates::list_gates,
        gates::get_gate,
        gates::save_gate,
        gates::delete_gate,
        // Monitor
        monitor::unlock_audio,
        // Stats
        stats::get_stats,
    ),
    components(
        schemas(
            // Auth
            auth::LoginRequest,
            auth::LoginResponse,
            crate::models::staff::StaffProfile,
            // Drivers
            crate::models::driver::DriverRecord,
            crate::models::driver::CreateBooking,
            crate::models::driver::CreateArrival,
            crate::models::driver::Position,
            crate::models::driver::ConfirmArrival,
            crate::models::driver::VerifyDriver,
            crate::models::driver::RejectDriver,
            crate::models::driver::CallDriver,
            crate::models::driver::RecallDriver,
            crate::models::driver::CompleteVisit,
            crate::models::enums::QueueStatus,
            crate::models::enums::Purpose,
            crate::models::enums::EntryType,
            crate::models::enums::Role,
            drivers::ConfirmArrivalResponse,
            crate::services::geo::LocationCheck,
            // Slots
            crate::models::slot::SlotInfo,
            // Gates
            crate::models::gate::GateConfig,
            crate::models::gate::SaveGateConfig,
            crate::models::enums::GateStatus,
            crate::models::enums::GateType,
            // Stats
            stats::StatsResponse,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Staff authentication"),
        (name = "slots", description = "Booking slot availability"),
        (name = "drivers", description = "Driver lifecycle"),
        (name = "gates", description = "Loading dock configuration"),
        (name = "monitor", description = "Public monitor"),
        (name = "stats", description = "Queue statistics")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
