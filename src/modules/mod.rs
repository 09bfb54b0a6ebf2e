pub mod health;
pub mod imports;
pub mod invoices;
pub mod parties;
pub mod products;
pub mod reports;
pub mod settings;
pub mod taxes;

use actix_web::web;

/// Mount every module's routes
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    health::controllers::configure(cfg);
    taxes::controllers::configure_tax_routes(cfg);
    products::controllers::configure(cfg);
    parties::controllers::configure(cfg);
    settings::controllers::configure(cfg);
    invoices::controllers::configure(cfg);
    imports::controllers::configure(cfg);
    reports::controllers::configure(cfg);
}
