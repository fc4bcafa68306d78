use crate::auth::Authenticated;
use crate::controller::Controller;
use crate::error::ErrorStatus;
use crate::handler::AppModule;
use crate::request::{
    AddCartItemRequest, CartTransformer, ClearCartRequest, GetCartRequest, RemoveCartItemRequest,
    UpdateCartItemRequest,
};
use crate::response::CartPresenter;
use application::service::{
    AddCartItemService, ClearCartService, GetCartService, RemoveCartItemService,
    UpdateCartItemService,
};
use axum::extract::{Path, State};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use uuid::Uuid;

pub trait CartRouter {
    fn route_cart(self) -> Self;
}

impl CartRouter for Router<AppModule> {
    fn route_cart(self) -> Self {
        self.route(
            "/carrito",
            get(
                |State(module): State<AppModule>, Authenticated(caller): Authenticated| async move {
                    Controller::new(CartTransformer, CartPresenter)
                        .intake(GetCartRequest::new(caller.user_id))
                        .handle(|dto| module.pgpool().get_cart(dto))
                        .await
                        .map_err(ErrorStatus::from)
                },
            )
            .delete(
                |State(module): State<AppModule>, Authenticated(caller): Authenticated| async move {
                    Controller::new(CartTransformer, CartPresenter)
                        .intake(ClearCartRequest::new(caller.user_id))
                        .handle(|dto| module.pgpool().clear_cart(dto))
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/carrito/items",
            post(
                |State(module): State<AppModule>,
                 Authenticated(caller): Authenticated,
                 Json(req): Json<AddCartItemRequest>| async move {
                    Controller::new(CartTransformer, CartPresenter)
                        .intake((caller.user_id, req))
                        .handle(|dto| module.pgpool().add_cart_item(dto))
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/carrito/items/:id",
            put(
                |State(module): State<AppModule>,
                 Authenticated(caller): Authenticated,
                 Path(id): Path<Uuid>,
                 Json(req): Json<UpdateCartItemRequest>| async move {
                    Controller::new(CartTransformer, CartPresenter)
                        .intake((caller.user_id, id, req))
                        .handle(|dto| module.pgpool().update_cart_item(dto))
                        .await
                        .map_err(ErrorStatus::from)
                },
            )
            .delete(
                |State(module): State<AppModule>,
                 Authenticated(caller): Authenticated,
                 Path(id): Path<Uuid>| async move {
                    Controller::new(CartTransformer, CartPresenter)
                        .intake(RemoveCartItemRequest::new(caller.user_id, id))
                        .handle(|dto| module.pgpool().remove_cart_item(dto))
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
    }
}
