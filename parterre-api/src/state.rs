use std::sync::Arc;

use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;

use parterre_booking::ReservationService;
use parterre_catalog::Catalog;
use parterre_core::payment::CheckoutUrls;

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<ReservationService>,
    pub catalog: Arc<Catalog>,
    pub checkout_urls: CheckoutUrls,
    pub webhook_secret: String,
    pub admin_password: String,
    pub cookie_key: Key,
}

impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Key {
        state.cookie_key.clone()
    }
}
