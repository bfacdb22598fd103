use super::optional;
use fraudo_core::{
    CheckedField, CoreError, FieldModel, FieldResolver, Payment, PaymentCheckedField, PaymentModel,
    Result,
};

/// Resolver for card payments
#[derive(Debug, Clone, Copy, Default)]
pub struct PaymentFieldResolver;

impl FieldResolver<Payment> for PaymentFieldResolver {
    fn resolve(&self, field: PaymentCheckedField, model: &PaymentModel) -> Result<FieldModel> {
        let name = self.storage_name(field)?;
        let resolved = match field {
            PaymentCheckedField::Email => optional(name, &model.email),
            PaymentCheckedField::Ip => optional(name, &model.ip),
            PaymentCheckedField::Fingerprint => optional(name, &model.fingerprint),
            PaymentCheckedField::CountryBank => optional(name, &model.bin_country_code),
            PaymentCheckedField::Bin => optional(name, &model.bin),
            PaymentCheckedField::Pan => optional(name, &model.pan),
            PaymentCheckedField::CardToken => optional(name, &model.card_token),
            PaymentCheckedField::Currency => FieldModel::new(name, model.currency.as_str()),
            PaymentCheckedField::ShopId => FieldModel::new(name, model.shop_id.as_str()),
            PaymentCheckedField::PartyId => FieldModel::new(name, model.party_id.as_str()),
            PaymentCheckedField::Mobile => FieldModel::new(name, model.mobile.to_string()),
            PaymentCheckedField::Recurrent => FieldModel::new(name, model.recurrent.to_string()),
            PaymentCheckedField::CountryIp => {
                return Err(CoreError::unsupported("payment", field.name()))
            }
        };
        Ok(resolved)
    }

    fn storage_name(&self, field: PaymentCheckedField) -> Result<&'static str> {
        match field {
            PaymentCheckedField::Email => Ok("email"),
            PaymentCheckedField::Ip => Ok("ip"),
            PaymentCheckedField::Fingerprint => Ok("fingerprint"),
            PaymentCheckedField::CountryBank => Ok("bank_country"),
            PaymentCheckedField::Bin => Ok("bin"),
            PaymentCheckedField::Pan => Ok("masked_pan"),
            PaymentCheckedField::CardToken => Ok("card_token"),
            PaymentCheckedField::Currency => Ok("currency"),
            PaymentCheckedField::ShopId => Ok("shop_id"),
            PaymentCheckedField::PartyId => Ok("party_id"),
            PaymentCheckedField::Mobile => Ok("mobile"),
            PaymentCheckedField::Recurrent => Ok("recurrent"),
            PaymentCheckedField::CountryIp => Err(CoreError::unsupported("payment", field.name())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model() -> PaymentModel {
        PaymentModel {
            party_id: "P1".to_string(),
            shop_id: "S1".to_string(),
            amount: 1500,
            currency: "RUB".to_string(),
            email: Some("a@x.com".to_string()),
            pan: Some("4111****1111".to_string()),
            bin_country_code: Some("RUS".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_resolve_uses_storage_names() {
        let resolver = PaymentFieldResolver;

        assert_eq!(
            resolver.resolve(PaymentCheckedField::Email, &model()).unwrap(),
            FieldModel::new("email", "a@x.com")
        );
        assert_eq!(
            resolver.resolve(PaymentCheckedField::Pan, &model()).unwrap(),
            FieldModel::new("masked_pan", "4111****1111")
        );
        assert_eq!(
            resolver
                .resolve(PaymentCheckedField::CountryBank, &model())
                .unwrap(),
            FieldModel::new("bank_country", "RUS")
        );
    }

    #[test]
    fn test_absent_attribute_is_empty() {
        let field = PaymentFieldResolver
            .resolve(PaymentCheckedField::CardToken, &model())
            .unwrap();
        assert_eq!(field.name, "card_token");
        assert!(field.is_empty());
    }

    #[test]
    fn test_country_ip_is_unsupported() {
        let resolver = PaymentFieldResolver;
        assert!(matches!(
            resolver.resolve(PaymentCheckedField::CountryIp, &model()),
            Err(CoreError::UnsupportedField { domain: "payment", .. })
        ));
        assert!(resolver
            .storage_name(PaymentCheckedField::CountryIp)
            .is_err());
    }

    #[test]
    fn test_every_other_field_is_mapped() {
        for field in PaymentCheckedField::all() {
            if *field != PaymentCheckedField::CountryIp {
                assert!(PaymentFieldResolver.resolve(*field, &model()).is_ok());
            }
        }
    }
}
