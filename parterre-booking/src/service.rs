use std::sync::Arc;

use parterre_catalog::pricing::SeatPricer;
use parterre_catalog::Catalog;
use parterre_core::payment::PaymentGateway;
use parterre_core::repository::ReservationStore;
use parterre_store::BusinessRules;

/// The reservation protocol engine. Holds the injected store handle and the
/// external collaborators; every operation re-reads the store next to its
/// writes instead of trusting anything cached here.
pub struct ReservationService {
    pub(crate) store: Arc<dyn ReservationStore>,
    pub(crate) catalog: Arc<Catalog>,
    pub(crate) pricer: Arc<dyn SeatPricer>,
    pub(crate) gateway: Arc<dyn PaymentGateway>,
    pub(crate) rules: BusinessRules,
}

impl ReservationService {
    pub fn new(
        store: Arc<dyn ReservationStore>,
        catalog: Arc<Catalog>,
        pricer: Arc<dyn SeatPricer>,
        gateway: Arc<dyn PaymentGateway>,
        rules: BusinessRules,
    ) -> Self {
        Self {
            store,
            catalog,
            pricer,
            gateway,
            rules,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn rules(&self) -> &BusinessRules {
        &self.rules
    }
}
