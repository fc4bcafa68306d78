use crate::controller::Intake;
use application::transfer::{
    CallerDto, CheckoutDto, GetOrderDto, ListOrdersDto, ListOwnOrdersDto, UpdateOrderStatusDto,
};
use serde::Deserialize;
use uuid::Uuid;

// Missing address fields deserialize as blank so that checkout reports
// which one is missing instead of a generic body rejection.
#[derive(Debug, Deserialize)]
pub struct CheckoutRequest {
    #[serde(default, alias = "direccion_envio")]
    address: String,
    #[serde(default, alias = "ciudad_envio")]
    city: String,
    #[serde(default, alias = "codigo_postal_envio")]
    postal_code: String,
    #[serde(default, alias = "telefono_contacto")]
    phone: String,
    #[serde(alias = "metodo_pago")]
    payment_method: Option<String>,
    #[serde(alias = "notas")]
    notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ListOrdersRequest {
    #[serde(alias = "estado")]
    status: Option<String>,
    page: Option<i32>,
    limit: Option<i32>,
}

#[derive(Debug)]
pub struct GetOrderRequest {
    caller: CallerDto,
    id: Uuid,
}

impl GetOrderRequest {
    pub fn new(caller: CallerDto, id: Uuid) -> Self {
        Self { caller, id }
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateOrderStatusRequest {
    #[serde(default, alias = "estado")]
    status: String,
}

pub struct OrderTransformer;

impl Intake<(Uuid, CheckoutRequest)> for OrderTransformer {
    type To = CheckoutDto;
    fn emit(&self, input: (Uuid, CheckoutRequest)) -> Self::To {
        let (user_id, input) = input;
        CheckoutDto {
            user_id,
            address: input.address,
            city: input.city,
            postal_code: input.postal_code,
            phone: input.phone,
            payment_method: input.payment_method,
            notes: input.notes,
        }
    }
}

impl Intake<ListOrdersRequest> for OrderTransformer {
    type To = ListOrdersDto;
    fn emit(&self, input: ListOrdersRequest) -> Self::To {
        ListOrdersDto {
            status: input.status,
            page: input.page,
            limit: input.limit,
        }
    }
}

impl Intake<(Uuid, ListOrdersRequest)> for OrderTransformer {
    type To = ListOwnOrdersDto;
    fn emit(&self, input: (Uuid, ListOrdersRequest)) -> Self::To {
        let (user_id, input) = input;
        ListOwnOrdersDto {
            user_id,
            filter: Intake::<ListOrdersRequest>::emit(self, input),
        }
    }
}

impl Intake<GetOrderRequest> for OrderTransformer {
    type To = GetOrderDto;
    fn emit(&self, input: GetOrderRequest) -> Self::To {
        GetOrderDto {
            caller: input.caller,
            id: input.id,
        }
    }
}

impl Intake<(Uuid, UpdateOrderStatusRequest)> for OrderTransformer {
    type To = UpdateOrderStatusDto;
    fn emit(&self, input: (Uuid, UpdateOrderStatusRequest)) -> Self::To {
        let (id, input) = input;
        UpdateOrderStatusDto {
            id,
            status: input.status,
        }
    }
}

#[cfg(test)]
mod test {
    use super::{CheckoutRequest, OrderTransformer, UpdateOrderStatusRequest};
    use crate::controller::Intake;
    use uuid::Uuid;

    #[test]
    fn checkout_reads_storefront_fields() {
        let request: CheckoutRequest = serde_json::from_str(
            r#"{
                "direccion_envio": "Av. Arequipa 1234",
                "ciudad_envio": "Lima",
                "codigo_postal_envio": "15046",
                "telefono_contacto": "987654321",
                "metodo_pago": "paypal"
            }"#,
        )
        .unwrap();
        let user_id = Uuid::new_v4();
        let dto = OrderTransformer.emit((user_id, request));
        assert_eq!(dto.user_id, user_id);
        assert_eq!(dto.city, "Lima");
        assert_eq!(dto.payment_method.as_deref(), Some("paypal"));
        assert!(dto.notes.is_none());
    }

    #[test]
    fn missing_address_fields_are_blank() {
        let request: CheckoutRequest = serde_json::from_str(r#"{"city": "Cusco"}"#).unwrap();
        let dto = OrderTransformer.emit((Uuid::new_v4(), request));
        assert!(dto.address.is_empty());
        assert!(dto.phone.is_empty());
        assert!(dto.payment_method.is_none());
    }

    #[test]
    fn status_accepts_estado() {
        let request: UpdateOrderStatusRequest =
            serde_json::from_str(r#"{"estado": "shipped"}"#).unwrap();
        let id = Uuid::new_v4();
        let dto = OrderTransformer.emit((id, request));
        assert_eq!(dto.id, id);
        assert_eq!(dto.status, "shipped");
    }
}
