use paperclip::actix::web;

use crate::handlers;

pub fn config_app(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/health").route(web::get().to(handlers::health)))
        .service(web::resource("/").route(web::get().to(handlers::index)))
        .service(
            web::scope("/search")
                .service(web::resource("").route(web::get().to(handlers::search)))
                .service(web::resource("/{book_id}").route(web::get().to(handlers::get_book))),
        )
        .service(web::resource("/reviews").route(web::get().to(handlers::get_reviews)));
}
