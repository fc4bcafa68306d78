use crate::controller::Intake;
use application::transfer::{
    AddCartItemDto, ClearCartDto, GetCartDto, RemoveCartItemDto, UpdateCartItemDto,
};
use serde::Deserialize;
use uuid::Uuid;

fn one() -> i32 {
    1
}

#[derive(Debug)]
pub struct GetCartRequest {
    user_id: Uuid,
}

impl GetCartRequest {
    pub fn new(user_id: Uuid) -> Self {
        Self { user_id }
    }
}

#[derive(Debug, Deserialize)]
pub struct AddCartItemRequest {
    #[serde(alias = "id_libro")]
    book_id: Uuid,
    #[serde(default = "one", alias = "cantidad")]
    quantity: i32,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCartItemRequest {
    #[serde(alias = "cantidad")]
    quantity: i32,
}

#[derive(Debug)]
pub struct RemoveCartItemRequest {
    user_id: Uuid,
    item_id: Uuid,
}

impl RemoveCartItemRequest {
    pub fn new(user_id: Uuid, item_id: Uuid) -> Self {
        Self { user_id, item_id }
    }
}

#[derive(Debug)]
pub struct ClearCartRequest {
    user_id: Uuid,
}

impl ClearCartRequest {
    pub fn new(user_id: Uuid) -> Self {
        Self { user_id }
    }
}

pub struct CartTransformer;

impl Intake<GetCartRequest> for CartTransformer {
    type To = GetCartDto;
    fn emit(&self, input: GetCartRequest) -> Self::To {
        GetCartDto {
            user_id: input.user_id,
        }
    }
}

impl Intake<(Uuid, AddCartItemRequest)> for CartTransformer {
    type To = AddCartItemDto;
    fn emit(&self, input: (Uuid, AddCartItemRequest)) -> Self::To {
        let (user_id, input) = input;
        AddCartItemDto {
            user_id,
            book_id: input.book_id,
            quantity: input.quantity,
        }
    }
}

impl Intake<(Uuid, Uuid, UpdateCartItemRequest)> for CartTransformer {
    type To = UpdateCartItemDto;
    fn emit(&self, input: (Uuid, Uuid, UpdateCartItemRequest)) -> Self::To {
        let (user_id, item_id, input) = input;
        UpdateCartItemDto {
            user_id,
            item_id,
            quantity: input.quantity,
        }
    }
}

impl Intake<RemoveCartItemRequest> for CartTransformer {
    type To = RemoveCartItemDto;
    fn emit(&self, input: RemoveCartItemRequest) -> Self::To {
        RemoveCartItemDto {
            user_id: input.user_id,
            item_id: input.item_id,
        }
    }
}

impl Intake<ClearCartRequest> for CartTransformer {
    type To = ClearCartDto;
    fn emit(&self, input: ClearCartRequest) -> Self::To {
        ClearCartDto {
            user_id: input.user_id,
        }
    }
}

#[cfg(test)]
mod test {
    use super::{AddCartItemRequest, CartTransformer};
    use crate::controller::Intake;
    use uuid::Uuid;

    #[test]
    fn quantity_defaults_to_one() {
        let book_id = Uuid::new_v4();
        let request: AddCartItemRequest =
            serde_json::from_str(&format!(r#"{{"id_libro":"{book_id}"}}"#)).unwrap();
        let user_id = Uuid::new_v4();
        let dto = CartTransformer.emit((user_id, request));
        assert_eq!(dto.user_id, user_id);
        assert_eq!(dto.book_id, book_id);
        assert_eq!(dto.quantity, 1);
    }
}
