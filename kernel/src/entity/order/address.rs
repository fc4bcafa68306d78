use destructure::Destructure;
use error_stack::Report;
use vodca::References;

use crate::KernelError;

#[derive(Debug, Clone, Eq, PartialEq, References, Destructure)]
pub struct ShippingAddress {
    address: String,
    city: String,
    postal_code: String,
    phone: String,
}

impl ShippingAddress {
    pub fn new(
        address: impl Into<String>,
        city: impl Into<String>,
        postal_code: impl Into<String>,
        phone: impl Into<String>,
    ) -> Self {
        Self {
            address: address.into(),
            city: city.into(),
            postal_code: postal_code.into(),
            phone: phone.into(),
        }
    }

    /// Trims every field and rejects blank ones.
    pub fn validated(self) -> error_stack::Result<Self, KernelError> {
        let fields = [
            ("address", self.address),
            ("city", self.city),
            ("postal_code", self.postal_code),
            ("phone", self.phone),
        ];
        let mut missing = Vec::new();
        let [address, city, postal_code, phone] = fields.map(|(name, value)| {
            let value = value.trim().to_string();
            if value.is_empty() {
                missing.push(name);
            }
            value
        });
        if !missing.is_empty() {
            return Err(Report::new(KernelError::Validation)
                .attach_printable(format!("missing shipping fields: {}", missing.join(", "))));
        }
        Ok(Self {
            address,
            city,
            postal_code,
            phone,
        })
    }
}

#[cfg(test)]
mod test {
    use super::ShippingAddress;
    use crate::KernelError;

    #[test]
    fn trims_fields() {
        let address = ShippingAddress::new(" Calle 1 ", "Lima", " 15001", "999888777 ")
            .validated()
            .unwrap();
        assert_eq!(address.address(), "Calle 1");
        assert_eq!(address.postal_code(), "15001");
        assert_eq!(address.phone(), "999888777");
    }

    #[test]
    fn blank_fields_are_rejected() {
        let error = ShippingAddress::new("Calle 1", "  ", "", "999")
            .validated()
            .unwrap_err();
        assert!(matches!(error.current_context(), KernelError::Validation));
    }
}
