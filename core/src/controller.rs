

/// Implemented by `#[budget_tracker_macros::controller]` for every annotated impl block.
pub trait Controller {
    fn router() -> axum::Router;
}
