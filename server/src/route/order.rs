use crate::auth::{Admin, Authenticated};
use crate::controller::Controller;
use crate::error::ErrorStatus;
use crate::handler::AppModule;
use crate::request::{
    CheckoutRequest, GetOrderRequest, ListOrdersRequest, OrderTransformer,
    UpdateOrderStatusRequest,
};
use crate::response::{CheckoutPresenter, OrderPresenter};
use application::service::{
    CheckoutService, GetOrderService, ListOrdersService, UpdateOrderStatusService,
};
use axum::extract::{Path, Query, State};
use axum::routing::{get, put};
use axum::{Json, Router};
use uuid::Uuid;

pub trait OrderRouter {
    fn route_order(self) -> Self;
}

impl OrderRouter for Router<AppModule> {
    fn route_order(self) -> Self {
        self.route(
            "/pedidos",
            get(
                |State(module): State<AppModule>,
                 Admin(_): Admin,
                 Query(req): Query<ListOrdersRequest>| async move {
                    Controller::new(OrderTransformer, OrderPresenter)
                        .intake(req)
                        .handle(|dto| module.pgpool().list_all_orders(dto))
                        .await
                        .map_err(ErrorStatus::from)
                },
            )
            .post(
                |State(module): State<AppModule>,
                 Authenticated(caller): Authenticated,
                 Json(req): Json<CheckoutRequest>| async move {
                    Controller::new(OrderTransformer, CheckoutPresenter)
                        .intake((caller.user_id, req))
                        .handle(|dto| module.pgpool().checkout(module.pricing(), dto))
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/pedidos/mis-pedidos",
            get(
                |State(module): State<AppModule>,
                 Authenticated(caller): Authenticated,
                 Query(req): Query<ListOrdersRequest>| async move {
                    Controller::new(OrderTransformer, OrderPresenter)
                        .intake((caller.user_id, req))
                        .handle(|dto| module.pgpool().list_own_orders(dto))
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/pedidos/:id",
            get(
                |State(module): State<AppModule>,
                 Authenticated(caller): Authenticated,
                 Path(id): Path<Uuid>| async move {
                    Controller::new(OrderTransformer, OrderPresenter)
                        .intake(GetOrderRequest::new(caller, id))
                        .handle(|dto| module.pgpool().get_order(dto))
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/pedidos/:id/estado",
            put(
                |State(module): State<AppModule>,
                 Admin(_): Admin,
                 Path(id): Path<Uuid>,
                 Json(req): Json<UpdateOrderStatusRequest>| async move {
                    Controller::new(OrderTransformer, OrderPresenter)
                        .intake((id, req))
                        .handle(|dto| module.pgpool().update_order_status(dto))
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
    }
}
