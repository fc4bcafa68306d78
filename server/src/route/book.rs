use crate::auth::Admin;
use crate::controller::Controller;
use crate::error::ErrorStatus;
use crate::handler::AppModule;
use crate::request::{
    BookTransformer, CreateBookRequest, DeleteBookRequest, FeaturedBooksRequest,
    GetBookBySlugRequest, GetBookRequest, ListBooksRequest, SearchBooksRequest, UpdateBookRequest,
};
use crate::response::BookPresenter;
use application::service::{
    CreateBookService, DeleteBookService, GetBookService, ListBooksService, UpdateBookService,
};
use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use uuid::Uuid;

pub trait BookRouter {
    fn route_book(self) -> Self;
}

impl BookRouter for Router<AppModule> {
    fn route_book(self) -> Self {
        self.route(
            "/libros",
            get(
                |State(module): State<AppModule>, Query(req): Query<ListBooksRequest>| async move {
                    Controller::new(BookTransformer, BookPresenter)
                        .intake(req)
                        .handle(|dto| module.pgpool().list_books(dto))
                        .await
                        .map_err(ErrorStatus::from)
                },
            )
            .post(
                |State(module): State<AppModule>,
                 Admin(_): Admin,
                 Json(req): Json<CreateBookRequest>| async move {
                    Controller::new(BookTransformer, BookPresenter)
                        .intake(req)
                        .handle(|dto| module.pgpool().create_book(dto))
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/libros/destacados",
            get(
                |State(module): State<AppModule>, Query(req): Query<FeaturedBooksRequest>| async move {
                    Controller::new(BookTransformer, BookPresenter)
                        .intake(req)
                        .handle(|dto| module.pgpool().featured_books(dto))
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/libros/buscar",
            get(
                |State(module): State<AppModule>, Query(req): Query<SearchBooksRequest>| async move {
                    Controller::new(BookTransformer, BookPresenter)
                        .intake(req)
                        .handle(|dto| module.pgpool().search_books(dto))
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/libros/slug/:slug",
            get(
                |State(module): State<AppModule>, Path(slug): Path<String>| async move {
                    Controller::new(BookTransformer, BookPresenter)
                        .intake(GetBookBySlugRequest::new(slug))
                        .handle(|dto| module.pgpool().get_book_by_slug(dto))
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/libros/:id",
            get(
                |State(module): State<AppModule>, Path(id): Path<Uuid>| async move {
                    Controller::new(BookTransformer, BookPresenter)
                        .intake(GetBookRequest::new(id))
                        .handle(|dto| module.pgpool().get_book(dto))
                        .await
                        .map_err(ErrorStatus::from)
                },
            )
            .put(
                |State(module): State<AppModule>,
                 Admin(_): Admin,
                 Path(id): Path<Uuid>,
                 Json(req): Json<UpdateBookRequest>| async move {
                    Controller::new(BookTransformer, BookPresenter)
                        .intake((id, req))
                        .handle(|dto| module.pgpool().update_book(dto))
                        .await
                        .map_err(ErrorStatus::from)
                },
            )
            .delete(
                |State(module): State<AppModule>, Admin(_): Admin, Path(id): Path<Uuid>| async move {
                    Controller::new(BookTransformer, BookPresenter)
                        .intake(DeleteBookRequest::new(id))
                        .handle(|dto| module.pgpool().delete_book(dto))
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/libros/:id/disponibilidad",
            get(
                |State(module): State<AppModule>, Path(id): Path<Uuid>| async move {
                    Controller::new(BookTransformer, BookPresenter)
                        .intake(GetBookRequest::new(id))
                        .handle(|dto| module.pgpool().get_availability(dto))
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
    }
}
