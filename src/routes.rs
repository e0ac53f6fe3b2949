use crate::{
    api::{payslip, reports},
    config::Config,
};
use actix_web::web;

pub fn configure(cfg: &mut web::ServiceConfig, config: Config) {
    cfg.service(
        web::scope(&config.api_prefix)
            // /payslips
            .service(
                web::resource("/payslips")
                    .route(web::get().to(payslip::list_payslips))
                    .route(web::post().to(payslip::create_payslip)),
            )
            // /payslips/{employee_id}/{month}
            .service(
                web::resource("/payslips/{employee_id}/{month}")
                    .route(web::get().to(payslip::get_payslip)),
            )
            // compliance reports
            .service(
                web::resource("/pf-records/{month}").route(web::get().to(reports::pf_records)),
            )
            .service(
                web::resource("/esic-records/{month}").route(web::get().to(reports::esic_records)),
            )
            .service(
                web::resource("/tax-records/{month}").route(web::get().to(reports::tax_records)),
            ),
    );
}
