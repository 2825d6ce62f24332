use serde::{Deserialize, Serialize};

use crate::entities::address::PostalAddress;
use crate::entities::institution::FinancialInstitutionIdentification;

/// A payment party: ordering customer/creditor/debtor, modeled as either an
/// account-holding customer (option K/F parties, pain `Dbtr`/`Cdtr`) or a
/// financial institution acting as a party (option A parties).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub enum Party {
    Customer {
        account: Option<String>,
        name: Option<String>,
        address: PostalAddress,
    },
    Institution(FinancialInstitutionIdentification),
}

impl Party {
    /// Dispatches a SWIFT party field body to the right shape based on its
    /// option letter, mirroring the field 50/52/57/59 option-letter rule:
    /// option `A` carries a BIC (with optional account on the first line),
    /// options `K`/`F`/no-letter carry free-text name-and-address lines
    /// (with optional account on the first line, prefixed `/`).
    pub fn from_option(option: Option<char>, lines: &[String]) -> Self {
        match option {
            Some('A') => {
                let mut account = None;
                let mut bic_line_idx = 0;
                if let Some(first) = lines.first() {
                    if let Some(acct) = first.strip_prefix('/') {
                        account = Some(acct.to_string());
                        bic_line_idx = 1;
                    }
                }
                let bic = lines.get(bic_line_idx).cloned();
                let _ = account;
                Party::Institution(FinancialInstitutionIdentification {
                    bic,
                    name: None,
                    clearing_system_member_id: None,
                })
            }
            _ => {
                let mut account = None;
                let mut rest = lines;
                if let Some(first) = lines.first() {
                    if let Some(acct) = first.strip_prefix('/') {
                        account = Some(acct.to_string());
                        rest = &lines[1..];
                    }
                }
                let name = rest.first().cloned();
                let address = PostalAddress::from_lines(rest.iter().skip(1).cloned().collect());
                Party::Customer {
                    account,
                    name,
                    address,
                }
            }
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            Party::Customer { name, .. } => name.as_deref(),
            Party::Institution(inst) => inst.name.as_deref(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dispatches_option_a_to_institution() {
        let party = Party::from_option(Some('A'), &["/123456".to_string(), "DEUTDEFF".to_string()]);
        match party {
            Party::Institution(inst) => assert_eq!(inst.bic.as_deref(), Some("DEUTDEFF")),
            _ => panic!("expected institution"),
        }
    }

    #[test]
    fn dispatches_option_k_to_customer() {
        let party = Party::from_option(
            Some('K'),
            &[
                "/DE89370400440532013000".to_string(),
                "MUELLER GMBH".to_string(),
                "HAUPTSTR 1".to_string(),
                "10115 BERLIN".to_string(),
            ],
        );
        match party {
            Party::Customer { account, name, address } => {
                assert_eq!(account.as_deref(), Some("DE89370400440532013000"));
                assert_eq!(name.as_deref(), Some("MUELLER GMBH"));
                assert_eq!(address.address_lines.len(), 2);
            }
            _ => panic!("expected customer"),
        }
    }
}
