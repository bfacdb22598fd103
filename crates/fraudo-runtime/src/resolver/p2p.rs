use super::optional;
use fraudo_core::{
    CheckedField, CoreError, FieldModel, FieldResolver, P2PCheckedField, P2PModel, Result, P2P,
};

/// Resolver for P2P transfers
#[derive(Debug, Clone, Copy, Default)]
pub struct P2PFieldResolver;

impl FieldResolver<P2P> for P2PFieldResolver {
    fn resolve(&self, field: P2PCheckedField, model: &P2PModel) -> Result<FieldModel> {
        let name = self.storage_name(field)?;
        let resolved = match field {
            P2PCheckedField::Email => optional(name, &model.email),
            P2PCheckedField::Ip => optional(name, &model.ip),
            P2PCheckedField::Fingerprint => optional(name, &model.fingerprint),
            P2PCheckedField::CountryBank => optional(name, &model.bin_country_code),
            P2PCheckedField::Bin => optional(name, &model.bin),
            P2PCheckedField::Pan => optional(name, &model.pan),
            P2PCheckedField::CardTokenFrom => optional(name, &model.card_token_from),
            P2PCheckedField::CardTokenTo => optional(name, &model.card_token_to),
            P2PCheckedField::Currency => FieldModel::new(name, model.currency.as_str()),
            P2PCheckedField::IdentityId => FieldModel::new(name, model.identity_id.as_str()),
            P2PCheckedField::CountryIp => return Err(CoreError::unsupported("p2p", field.name())),
        };
        Ok(resolved)
    }

    fn storage_name(&self, field: P2PCheckedField) -> Result<&'static str> {
        match field {
            P2PCheckedField::Email => Ok("email"),
            P2PCheckedField::Ip => Ok("ip"),
            P2PCheckedField::Fingerprint => Ok("fingerprint"),
            P2PCheckedField::CountryBank => Ok("bank_country"),
            P2PCheckedField::Bin => Ok("bin"),
            P2PCheckedField::Pan => Ok("masked_pan"),
            P2PCheckedField::CardTokenFrom => Ok("card_token_from"),
            P2PCheckedField::CardTokenTo => Ok("card_token_to"),
            P2PCheckedField::Currency => Ok("currency"),
            P2PCheckedField::IdentityId => Ok("identity_id"),
            P2PCheckedField::CountryIp => Err(CoreError::unsupported("p2p", field.name())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_transfer_fields() {
        let model = P2PModel {
            identity_id: "I1".to_string(),
            amount: 700,
            currency: "USD".to_string(),
            card_token_from: Some("from".to_string()),
            card_token_to: Some("to".to_string()),
            ..Default::default()
        };
        let resolver = P2PFieldResolver;

        assert_eq!(
            resolver
                .resolve(P2PCheckedField::IdentityId, &model)
                .unwrap(),
            FieldModel::new("identity_id", "I1")
        );
        assert_eq!(
            resolver
                .resolve(P2PCheckedField::CardTokenTo, &model)
                .unwrap(),
            FieldModel::new("card_token_to", "to")
        );
        assert!(resolver
            .resolve(P2PCheckedField::Email, &model)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_country_ip_is_unsupported() {
        assert_eq!(
            P2PFieldResolver.storage_name(P2PCheckedField::CountryIp),
            Err(CoreError::unsupported("p2p", "country_ip"))
        );
    }
}
