//! Request handler definitions
//!
//! Define each route and it handler here.
//! Handlers that are more than a line or two MUST go into a separate module. Keep this module neat and tidy 🙏
//!
//! A note about performance:
//! Since each worker thread processes its requests sequentially, handlers which block the current thread will cause the
//! current worker to stop processing new requests:
//! ```nocompile
//!     fn my_handler() -> impl Responder {
//!         std::thread::sleep(Duration::from_secs(5)); // <-- Bad practice! Will cause the current worker thread to
//! hang!
//!     }
//! ```
//! For this reason, any long, non-cpu-bound operation (e.g. I/O, database operations, etc.) should be expressed as
//! futures or asynchronous functions. Async handlers get executed concurrently by worker threads and thus don’t block
//! execution:
//!
//! ```nocompile
//!     async fn my_handler() -> impl Responder {
//!         tokio::time::sleep(Duration::from_secs(5)).await; // <-- Ok. Worker thread will handle other requests here
//!     }
//! ```
use actix_web::{get, http::header, web, HttpResponse, Responder};
use bistro_engine::{
    api::{objects::Pagination, RegistrationRequest},
    db_types::{FoodPhoto, FoodUpdate, NewFood, NewOrder, PublicUser, Role},
    traits::{MenuManagement, NotificationManagement, OrderManagement, UserManagement},
    MenuApi,
    NotificationApi,
    OrderFlowApi,
    UserApi,
};
use log::*;
use serde_json::json;

use crate::{
    auth::{JwtClaims, TokenIssuer},
    data_objects::{
        CartUpdateRequest,
        CheckoutRequest,
        JsonResponse,
        LoginRequest,
        LoginResponse,
        NewFoodRequest,
        OrderStatusRequest,
        PhotoPayload,
        UpdateFoodRequest,
        UpdateProfileRequest,
        WishlistResponse,
        WishlistToggleRequest,
    },
    errors::ServerError,
    live::LiveBroadcaster,
};

/// The fixed page size of the paginated product list endpoint.
pub const PRODUCT_PAGE_SIZE: u32 = 8;

// Web-actix cannot handle generics in handlers, so it's implemented manually using the `route!` macro
#[macro_export]
macro_rules! route {
    ($name:ident => $method:ident $path:literal requires [$($roles:ty),*]) => {
        paste::paste! { pub struct [<$name:camel Route>];}
        paste::paste! {
                impl [<$name:camel Route>] {
                #[allow(clippy::new_without_default)]
                pub fn new() -> Self { Self }
            }
        }
        paste::paste! {
            impl actix_web::dev::HttpServiceFactory for [<$name:camel Route>] {
                fn register(self, config: &mut actix_web::dev::AppService) {
                    let res = actix_web::Resource::new($path)
                        .name(stringify!($name))
                        .guard(actix_web::guard::$method())
                        .to($name)
                        .wrap($crate::middleware::AclMiddlewareFactory::new(&[$($roles),+]));
                    actix_web::dev::HttpServiceFactory::register(res, config);
                }
            }
        }
    };

    ($name:ident => $method:ident $path:literal impl $($bounds:ty),+) => {
        paste::paste! { pub struct [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ >( $( core::marker::PhantomData<fn() -> [< T $bounds:camel> ] >,)+ );}
        paste::paste! { impl< $( [< T $bounds:camel> ],)+ > [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ > {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self($( core::marker::PhantomData::<fn() -> [< T $bounds:camel> ] >,)+)
            }
        }}
        paste::paste! { impl<$( [< T $bounds:camel >] , )+> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<$([<T $bounds:camel>],)+>
        where
            $([<T $bounds:camel>]: $bounds + 'static,)+
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::< $( [< T $bounds:camel >], )+>);
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };

    ($name:ident => $method:ident $path:literal impl $($bounds:ty),+ where requires [$($roles:ty),*])  => {
        paste::paste! { pub struct [<$name:camel Route>]<A>(core::marker::PhantomData<fn() -> A>);}
        paste::paste! { impl<A> [<$name:camel Route>]<A> {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self(core::marker::PhantomData::<fn() -> A>)
            }
        }}
        paste::paste! { impl<A> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<A>
        where
            A: $($bounds)++ 'static,
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::<A>)
                    .wrap($crate::middleware::AclMiddlewareFactory::new(&[$($roles),+]));
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

//----------------------------------------------   Auth  ----------------------------------------------------
route!(register => Post "/auth/register" impl UserManagement);
/// Route handler for the registration endpoint
///
/// Opens a new customer account. Password and security answer are hashed inside the engine; the
/// response carries the public projection of the new account. An optional guest cart becomes the
/// account cart.
pub async fn register<B: UserManagement>(
    body: web::Json<RegistrationRequest>,
    api: web::Data<UserApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let req = body.into_inner();
    trace!("💻️ Received registration request for {}", req.email);
    let user = api.register(req).await?;
    Ok(HttpResponse::Created().json(PublicUser::from(user)))
}

route!(login => Post "/auth/login" impl UserManagement);
/// Route handler for the login endpoint
///
/// Checks credentials and, if they hold, issues a JWT access token valid for seven days. A guest
/// cart supplied with the login is merged into the account cart. The response carries the public
/// user, the (merged) cart, the wishlist, and the token.
pub async fn login<B: UserManagement>(
    body: web::Json<LoginRequest>,
    api: web::Data<UserApi<B>>,
    signer: web::Data<TokenIssuer>,
) -> Result<HttpResponse, ServerError> {
    let req = body.into_inner();
    trace!("💻️ Received login request for {}", req.email);
    let (user, cart) = api.login(&req.email, &req.password, req.cart).await?;
    let wishlist = api.wishlist(user.id).await?;
    let claims = JwtClaims { user_id: user.id, email: user.email.clone(), roles: user.role.granted_roles() };
    let token = signer.issue_token(claims)?;
    debug!("💻️ Issued access token for {}", user.email);
    Ok(HttpResponse::Ok().json(LoginResponse { user: PublicUser::from(user), cart, wishlist, token }))
}

route!(user_auth => Get "/auth/user-auth" requires [Role::Customer]);
/// Returns 200 for any valid customer token. The storefront uses this to guard its private pages.
pub async fn user_auth() -> impl Responder {
    HttpResponse::Ok().json(json!({"ok": true}))
}

route!(admin_auth => Get "/auth/admin-auth" requires [Role::Admin]);
/// Returns 200 for any valid admin token. The storefront uses this to guard its admin pages.
pub async fn admin_auth() -> impl Responder {
    HttpResponse::Ok().json(json!({"ok": true}))
}

route!(all_users => Get "/auth/all-users" impl UserManagement where requires [Role::Admin]);
pub async fn all_users<B: UserManagement>(api: web::Data<UserApi<B>>) -> Result<HttpResponse, ServerError> {
    debug!("💻️ GET all users");
    let users = api.all_users().await?;
    let users = users.into_iter().map(PublicUser::from).collect::<Vec<_>>();
    Ok(HttpResponse::Ok().json(users))
}

route!(update_profile => Put "/auth/profile/update" impl UserManagement where requires [Role::Customer]);
pub async fn update_profile<B: UserManagement>(
    claims: JwtClaims,
    body: web::Json<UpdateProfileRequest>,
    api: web::Data<UserApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let req = body.into_inner();
    debug!("💻️ PUT profile update for user #{}", claims.user_id);
    let user = api.update_profile(claims.user_id, req.name, req.password, req.phone, req.address).await?;
    Ok(HttpResponse::Ok().json(PublicUser::from(user)))
}

//----------------------------------------------   Cart and wishlist  -----------------------------------------
route!(get_cart => Get "/auth/profile/cart" impl UserManagement where requires [Role::Customer]);
pub async fn get_cart<B: UserManagement>(
    claims: JwtClaims,
    api: web::Data<UserApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let cart = api.cart(claims.user_id).await?;
    Ok(HttpResponse::Ok().json(cart))
}

route!(put_cart => Put "/auth/profile/cart" impl UserManagement where requires [Role::Customer]);
/// Replaces the account cart wholesale. The storefront debounces these writes; last write wins.
pub async fn put_cart<B: UserManagement>(
    claims: JwtClaims,
    body: web::Json<CartUpdateRequest>,
    api: web::Data<UserApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let cart = api.replace_cart(claims.user_id, &body.items).await?;
    Ok(HttpResponse::Ok().json(cart))
}

route!(toggle_wishlist => Post "/auth/wishlist/toggle" impl UserManagement where requires [Role::Customer]);
pub async fn toggle_wishlist<B: UserManagement>(
    claims: JwtClaims,
    body: web::Json<WishlistToggleRequest>,
    api: web::Data<UserApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let (added, wishlist) = api.toggle_wishlist(claims.user_id, body.food_id).await?;
    Ok(HttpResponse::Ok().json(WishlistResponse { added, wishlist }))
}

route!(get_wishlist => Get "/auth/wishlist" impl UserManagement where requires [Role::Customer]);
pub async fn get_wishlist<B: UserManagement>(
    claims: JwtClaims,
    api: web::Data<UserApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let wishlist = api.wishlist(claims.user_id).await?;
    Ok(HttpResponse::Ok().json(wishlist))
}

//----------------------------------------------   Menu  ----------------------------------------------------
route!(create_food => Post "/menu/create-food" impl MenuManagement where requires [Role::Admin]);
/// Route handler for the create-food endpoint
///
/// The slug is derived from the name inside the engine; a clash with an existing slug returns 409.
/// Fires a `ProductCreated` event, which lands on the live channel and in the notification log.
pub async fn create_food<B: MenuManagement>(
    body: web::Json<NewFoodRequest>,
    api: web::Data<MenuApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let req = body.into_inner();
    debug!("💻️ POST create food '{}'", req.name);
    let photo = req.photo.map(decode_photo).transpose()?;
    let food = NewFood {
        name: req.name,
        slug: String::new(),
        description: req.description,
        price: req.price,
        category: req.category,
        quantity: req.quantity,
        photo,
    };
    let food = api.create_food(food).await?;
    Ok(HttpResponse::Created().json(food))
}

route!(update_food => Put "/menu/update-food/{id}" impl MenuManagement where requires [Role::Admin]);
pub async fn update_food<B: MenuManagement>(
    path: web::Path<i64>,
    body: web::Json<UpdateFoodRequest>,
    api: web::Data<MenuApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let id = path.into_inner();
    let req = body.into_inner();
    debug!("💻️ PUT update food #{id}");
    let photo = req.photo.map(decode_photo).transpose()?;
    let update = FoodUpdate {
        name: req.name,
        slug: None,
        description: req.description,
        price: req.price,
        category: req.category,
        quantity: req.quantity,
        photo,
    };
    let food = api.update_food(id, update).await?;
    Ok(HttpResponse::Ok().json(food))
}

route!(delete_food => Delete "/menu/delete-food/{id}" impl MenuManagement where requires [Role::Admin]);
pub async fn delete_food<B: MenuManagement>(
    path: web::Path<i64>,
    api: web::Data<MenuApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let id = path.into_inner();
    debug!("💻️ DELETE food #{id}");
    api.delete_food(id).await?;
    Ok(HttpResponse::Ok().json(JsonResponse::success("Food deleted")))
}

route!(get_menu => Get "/menu/get-menu" impl MenuManagement);
pub async fn get_menu<B: MenuManagement>(api: web::Data<MenuApi<B>>) -> Result<HttpResponse, ServerError> {
    let menu = api.menu().await?;
    Ok(HttpResponse::Ok().json(menu))
}

route!(get_food => Get "/menu/get-food/{slug}" impl MenuManagement);
pub async fn get_food<B: MenuManagement>(
    path: web::Path<String>,
    api: web::Data<MenuApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let slug = path.into_inner();
    let food = api.food_by_slug(&slug).await?.ok_or_else(|| ServerError::NoRecordFound(format!("Food '{slug}'")))?;
    Ok(HttpResponse::Ok().json(food))
}

route!(food_photo => Get "/menu/food-photo/{id}" impl MenuManagement);
/// Serves the raw photo bytes with the stored content type.
pub async fn food_photo<B: MenuManagement>(
    path: web::Path<i64>,
    api: web::Data<MenuApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let id = path.into_inner();
    let photo = api.photo(id).await?.ok_or_else(|| ServerError::NoRecordFound(format!("Photo for food #{id}")))?;
    let FoodPhoto { data, mime_type } = photo;
    Ok(HttpResponse::Ok().content_type(mime_type).insert_header(header::CacheControl(vec![
        header::CacheDirective::MaxAge(86400),
    ])).body(data))
}

route!(product_count => Get "/menu/product-count" impl MenuManagement);
pub async fn product_count<B: MenuManagement>(api: web::Data<MenuApi<B>>) -> Result<HttpResponse, ServerError> {
    let total = api.count().await?;
    Ok(HttpResponse::Ok().json(json!({"total": total})))
}

route!(product_list => Get "/menu/product-list/{page}" impl MenuManagement);
/// One fixed-size page of the menu, newest first. Pages are 1-based.
pub async fn product_list<B: MenuManagement>(
    path: web::Path<u32>,
    api: web::Data<MenuApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let page = path.into_inner();
    let foods = api.page(page, PRODUCT_PAGE_SIZE).await?;
    Ok(HttpResponse::Ok().json(foods))
}

fn decode_photo(payload: PhotoPayload) -> Result<FoodPhoto, ServerError> {
    let data = base64::decode(&payload.data)
        .map_err(|e| ServerError::InvalidRequestBody(format!("The photo is not valid base64. {e}")))?;
    Ok(FoodPhoto { data, mime_type: payload.mime_type })
}

//----------------------------------------------   Orders  ----------------------------------------------------
route!(create_order => Post "/orders/create-order" impl OrderManagement where requires [Role::Customer]);
/// Route handler for the checkout endpoint
///
/// Places a new order for the caller. Unit prices are captured server-side from the menu, and the
/// caller's cart is cleared in the same transaction. The payment object is stored verbatim.
pub async fn create_order<B: OrderManagement>(
    claims: JwtClaims,
    body: web::Json<CheckoutRequest>,
    api: web::Data<OrderFlowApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let req = body.into_inner();
    debug!("💻️ POST create order for user #{}", claims.user_id);
    let order = NewOrder {
        buyer_id: claims.user_id,
        items: req.items,
        payment: req.payment.unwrap_or_else(|| json!({})),
    };
    let order = api.place_order(order).await?;
    Ok(HttpResponse::Created().json(order))
}

route!(get_orders => Get "/orders/get-orders" impl OrderManagement where requires [Role::Customer]);
pub async fn get_orders<B: OrderManagement>(
    claims: JwtClaims,
    api: web::Data<OrderFlowApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let orders = api.orders_for_buyer(claims.user_id).await?;
    Ok(HttpResponse::Ok().json(orders))
}

route!(all_orders => Get "/orders/all-orders" impl OrderManagement where requires [Role::Admin]);
pub async fn all_orders<B: OrderManagement>(api: web::Data<OrderFlowApi<B>>) -> Result<HttpResponse, ServerError> {
    debug!("💻️ GET all orders");
    let orders = api.all_orders().await?;
    Ok(HttpResponse::Ok().json(orders))
}

route!(order_status => Put "/orders/order-status/{order_id}" impl OrderManagement where requires [Role::Admin]);
/// Sets an order's status. No transition validation is applied; admins can move orders freely.
/// Fires an `OrderStatusChanged` event, which notifies the buyer.
pub async fn order_status<B: OrderManagement>(
    path: web::Path<i64>,
    body: web::Json<OrderStatusRequest>,
    api: web::Data<OrderFlowApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let order_id = path.into_inner();
    debug!("💻️ PUT order status for #{order_id}");
    let order = api.update_status(order_id, body.status).await?;
    Ok(HttpResponse::Ok().json(order))
}

route!(order_by_id => Get "/orders/{order_id}" impl OrderManagement where requires [Role::Customer]);
/// Customers can fetch their own orders; admins can fetch anyone's. A customer asking for another
/// buyer's order gets a 404, the same as for an order that does not exist.
pub async fn order_by_id<B: OrderManagement>(
    claims: JwtClaims,
    path: web::Path<i64>,
    api: web::Data<OrderFlowApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let order_id = path.into_inner();
    let not_found = || ServerError::NoRecordFound(format!("Order #{order_id}"));
    let order = api.order_by_id(order_id).await?.ok_or_else(not_found)?;
    if order.order.buyer_id != claims.user_id && !claims.roles.contains(&Role::Admin) {
        debug!("💻️ User #{} asked for order #{order_id}, which is not theirs", claims.user_id);
        return Err(not_found());
    }
    Ok(HttpResponse::Ok().json(order))
}

//----------------------------------------------   Notifications  ---------------------------------------------
route!(get_notifications => Get "/notifications/get-notifications" impl NotificationManagement where requires [Role::Customer]);
/// One page of the caller's notification feed, with total and unread counts for badges.
pub async fn get_notifications<B: NotificationManagement>(
    claims: JwtClaims,
    query: web::Query<Pagination>,
    api: web::Data<NotificationApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let page = api.page_for_user(claims.user_id, &query.into_inner()).await?;
    Ok(HttpResponse::Ok().json(page))
}

route!(mark_read => Put "/notifications/mark-read/{id}" impl NotificationManagement where requires [Role::Customer]);
pub async fn mark_read<B: NotificationManagement>(
    claims: JwtClaims,
    path: web::Path<i64>,
    api: web::Data<NotificationApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let id = path.into_inner();
    api.mark_read(id, claims.user_id).await?;
    Ok(HttpResponse::Ok().json(JsonResponse::success("Notification marked as read")))
}

route!(mark_all_read => Put "/notifications/mark-all-read" impl NotificationManagement where requires [Role::Customer]);
pub async fn mark_all_read<B: NotificationManagement>(
    claims: JwtClaims,
    api: web::Data<NotificationApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let marked = api.mark_all_read(claims.user_id).await?;
    Ok(HttpResponse::Ok().json(json!({"marked": marked})))
}

route!(notification_stream => Get "/notifications/stream" requires [Role::Customer]);
/// Route handler for the live channel
///
/// Holds the response open as a Server-Sent Events stream and registers the connection under the
/// caller's user id. Events arrive as named SSE events with JSON payloads.
pub async fn notification_stream(claims: JwtClaims, broadcaster: web::Data<LiveBroadcaster>) -> impl Responder {
    debug!("💻️ Opening live stream for user #{}", claims.user_id);
    let stream = broadcaster.register(claims.user_id);
    HttpResponse::Ok()
        .content_type("text/event-stream")
        .insert_header(header::CacheControl(vec![header::CacheDirective::NoCache]))
        .streaming(stream)
}
