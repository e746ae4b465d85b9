//! Request handlers for the drinks menu, and the `route!` macro that registers them with an optional permission
//! requirement.
use actix_web::{get, http::Method, web, HttpRequest, HttpResponse, Responder};
use coffee_shop_engine::{db_types::Drink, traits::DrinkManagement, DrinksApi};
use log::*;

use crate::{
    auth::ClaimSet,
    data_objects::{DeleteResponse, DrinksResponse, NewDrinkRequest},
    errors::ServerError,
    helpers::{is_known_route, parse_update_request},
};

// Web-actix cannot handle generics in handlers, so it's implemented manually using the `route!` macro
#[macro_export]
macro_rules! route {
    ($name:ident => $method:ident $path:literal impl $bounds:ty where requires $permission:literal) => {
        paste::paste! { pub struct [<$name:camel Route>]<A>(core::marker::PhantomData<fn() -> A>);}
        paste::paste! { impl<A> [<$name:camel Route>]<A> {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self(core::marker::PhantomData::<fn() -> A>)
            }
        }}
        paste::paste! { impl<A> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<A>
        where
            A: $bounds + 'static,
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::<A>)
                    .wrap($crate::middleware::AclMiddlewareFactory::new($permission));
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };

    ($name:ident => $method:ident $path:literal impl $bounds:ty) => {
        paste::paste! { pub struct [<$name:camel Route>]<A>(core::marker::PhantomData<fn() -> A>);}
        paste::paste! { impl<A> [<$name:camel Route>]<A> {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self(core::marker::PhantomData::<fn() -> A>)
            }
        }}
        paste::paste! { impl<A> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<A>
        where
            A: $bounds + 'static,
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::<A>);
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };
}

// ----------------------------------------------   Health  ----------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

//----------------------------------------------   Menu  ----------------------------------------------------
route!(get_drinks => Get "/drinks" impl DrinkManagement);
/// The public menu. Ingredient names are left out of every recipe.
pub async fn get_drinks<B: DrinkManagement>(api: web::Data<DrinksApi<B>>) -> Result<HttpResponse, ServerError> {
    trace!("💻️ GET drinks");
    let drinks = api.drinks().await?.iter().map(Drink::short).collect::<Vec<_>>();
    trace!("💻️ Returning {} drinks", drinks.len());
    Ok(HttpResponse::Ok().json(DrinksResponse::new(drinks)))
}

route!(drinks_detail => Get "/drinks-detail" impl DrinkManagement where requires "get:drinks-detail");
/// The full menu, including the ingredient names of every recipe.
pub async fn drinks_detail<B: DrinkManagement>(
    claims: ClaimSet,
    api: web::Data<DrinksApi<B>>,
) -> Result<HttpResponse, ServerError> {
    trace!("💻️ GET drinks-detail for {}", claims.subject());
    let drinks = api.drinks().await?.iter().map(Drink::long).collect::<Vec<_>>();
    Ok(HttpResponse::Ok().json(DrinksResponse::new(drinks)))
}

//----------------------------------------------   Drinks  ----------------------------------------------------
route!(create_drink => Post "/drinks" impl DrinkManagement where requires "post:drinks");
pub async fn create_drink<B: DrinkManagement>(
    claims: ClaimSet,
    body: web::Json<NewDrinkRequest>,
    api: web::Data<DrinksApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let request = body.into_inner();
    debug!("💻️ {} is adding {} to the menu", claims.subject(), request.title);
    let drink = api.create_drink(request.into()).await?;
    Ok(HttpResponse::Ok().json(DrinksResponse::new(vec![drink.long()])))
}

route!(update_drink => Patch "/drinks/{id}" impl DrinkManagement where requires "patch:drinks");
/// Applies a partial update to a drink.
///
/// The body is read as raw bytes rather than through the JSON extractor, so that an empty body can be told apart from
/// a malformed one. An empty body is rejected before the drink is looked up.
pub async fn update_drink<B: DrinkManagement>(
    claims: ClaimSet,
    path: web::Path<i64>,
    body: web::Bytes,
    api: web::Data<DrinksApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let id = path.into_inner();
    let update = parse_update_request(&body)?;
    debug!("💻️ {} is updating drink #{id}", claims.subject());
    let drink = api
        .update_drink(id, update.into())
        .await?
        .ok_or_else(|| ServerError::NoRecordFound(format!("Drink #{id} does not exist")))?;
    debug!("💻️ {drink} has been updated");
    Ok(HttpResponse::Ok().json(DrinksResponse::new(vec![drink.long()])))
}

route!(delete_drink => Delete "/drinks/{id}" impl DrinkManagement where requires "delete:drinks");
pub async fn delete_drink<B: DrinkManagement>(
    claims: ClaimSet,
    path: web::Path<i64>,
    api: web::Data<DrinksApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let id = path.into_inner();
    debug!("💻️ {} is deleting drink #{id}", claims.subject());
    if !api.delete_drink(id).await? {
        return Err(ServerError::NoRecordFound(format!("Drink #{id} does not exist")));
    }
    Ok(HttpResponse::Ok().json(DeleteResponse::new(id)))
}

//----------------------------------------------   Fallback  ----------------------------------------------------
/// Handles every request that no route matched.
///
/// CORS preflight requests succeed on any path. Otherwise, a known path means that the method was wrong.
pub async fn fallback(req: HttpRequest) -> Result<HttpResponse, ServerError> {
    if req.method() == Method::OPTIONS {
        return Ok(HttpResponse::Ok().finish());
    }
    if is_known_route(req.path()) {
        Err(ServerError::MethodNotAllowed(format!("{} {}", req.method(), req.path())))
    } else {
        Err(ServerError::NoRecordFound(format!("No route for {}", req.path())))
    }
}
