//! Route registration for the `/api/v1` scope.
//!
//! Literal segments must be registered before the `{id}` routes that would
//! otherwise capture them, hence `admin_status` ahead of `get_user`.

use actix_web::web;

use crate::inbound::http::adopts::{
    create_adoption, delete_adoption, get_adoption, list_adoptions, upsert_adoption,
};
use crate::inbound::http::campaigns::{
    create_campaign, delete_campaign, get_campaign, list_campaigns, update_campaign,
};
use crate::inbound::http::donations::{
    create_donation, delete_donation, get_donation, list_donations, update_donation,
};
use crate::inbound::http::payments::{
    create_payment, create_payment_intent, delete_payment, get_payment, list_payments,
};
use crate::inbound::http::pets::{create_pet, delete_pet, get_pet, list_pets, update_pet};
use crate::inbound::http::users::{
    admin_status, delete_user, get_user, list_users, login, logout, make_admin, register_user,
    update_user,
};

/// Register every API handler on `cfg`.
///
/// # Examples
/// ```
/// use actix_web::{App, web};
/// use backend::inbound::http::routes::api_routes;
///
/// let _app = App::new().service(web::scope("/api/v1").configure(api_routes));
/// ```
pub fn api_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(login)
        .service(logout)
        .service(register_user)
        .service(list_users)
        .service(admin_status)
        .service(make_admin)
        .service(get_user)
        .service(update_user)
        .service(delete_user)
        .service(create_pet)
        .service(list_pets)
        .service(get_pet)
        .service(update_pet)
        .service(delete_pet)
        .service(create_adoption)
        .service(list_adoptions)
        .service(get_adoption)
        .service(upsert_adoption)
        .service(delete_adoption)
        .service(create_campaign)
        .service(list_campaigns)
        .service(get_campaign)
        .service(update_campaign)
        .service(delete_campaign)
        .service(create_donation)
        .service(list_donations)
        .service(get_donation)
        .service(update_donation)
        .service(delete_donation)
        .service(create_payment_intent)
        .service(create_payment)
        .service(list_payments)
        .service(get_payment)
        .service(delete_payment);
}
