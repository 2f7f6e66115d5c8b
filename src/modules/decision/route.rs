use crate::modules::decision::handle::*;
use actix_web::web::{scope, ServiceConfig};

pub fn configure(cfg: &mut ServiceConfig) {
    cfg.service(
        scope("/liked-you")
            .service(list_new_liked_you)
            .service(count_liked_you)
            .service(list_liked_you),
    )
    .service(scope("/decisions").service(put_decision));
}
