// Application wiring shared by the binary and the API tests

use std::sync::Arc;

use actix_web::web;
use sqlx::SqlitePool;

use crate::config::{InventoryConfig, InvoicingConfig};
use crate::core::Result;
use crate::middleware::error_handler;
use crate::modules::configure_routes;
use crate::modules::imports::ImportService;
use crate::modules::invoices::{InvoiceService, SqliteInvoiceGateway};
use crate::modules::parties::PartyRepository;
use crate::modules::products::ProductRepository;
use crate::modules::reports::{ReportService, SqliteReportRepository};
use crate::modules::settings::{CompanyProfileStore, SettingsRepository};
use crate::modules::taxes::TaxCalculator;

/// Every service handed to request handlers, built once at startup
#[derive(Clone)]
pub struct AppState {
    pub pool: web::Data<SqlitePool>,
    pub tax_calculator: web::Data<TaxCalculator>,
    pub products: web::Data<ProductRepository>,
    pub parties: web::Data<PartyRepository>,
    pub profile_store: web::Data<CompanyProfileStore>,
    pub invoices: web::Data<InvoiceService>,
    pub imports: web::Data<ImportService>,
    pub reports: web::Data<ReportService>,
}

impl AppState {
    pub async fn build(
        pool: SqlitePool,
        invoicing: InvoicingConfig,
        inventory: InventoryConfig,
    ) -> Result<Self> {
        let products = ProductRepository::new(pool.clone());
        let parties = PartyRepository::new(pool.clone());
        let profile_store =
            Arc::new(CompanyProfileStore::load(SettingsRepository::new(pool.clone())).await?);

        let gateway = Arc::new(SqliteInvoiceGateway::new(
            pool.clone(),
            invoicing.sequence_width,
        ));
        let invoices = InvoiceService::new(
            gateway,
            parties.clone(),
            profile_store.clone(),
            invoicing,
        );
        let imports = ImportService::new(products.clone(), parties.clone());
        let reports = ReportService::new(
            Arc::new(SqliteReportRepository::new(pool.clone())),
            inventory,
        );

        Ok(Self {
            pool: web::Data::new(pool),
            tax_calculator: web::Data::new(TaxCalculator::new()),
            products: web::Data::new(products),
            parties: web::Data::new(parties),
            profile_store: web::Data::from(profile_store),
            invoices: web::Data::new(invoices),
            imports: web::Data::new(imports),
            reports: web::Data::new(reports),
        })
    }

    /// Register shared state, extractor error handlers and all routes
    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(self.pool.clone())
            .app_data(self.tax_calculator.clone())
            .app_data(self.products.clone())
            .app_data(self.parties.clone())
            .app_data(self.profile_store.clone())
            .app_data(self.invoices.clone())
            .app_data(self.imports.clone())
            .app_data(self.reports.clone());

        error_handler::configure(cfg);
        configure_routes(cfg);
    }
}
