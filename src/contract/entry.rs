//! # Entry Points
//!
//! Every registry contract exposes the same six names. [`EntryPoint`] is the parsed
//! form of an invocation: the function name plus its positional arguments, checked for
//! arity and converted into the entity's typed parameters.

use crate::contract::args::ContractArgs;
use crate::contract::ContractError;
use crate::registry::LedgerEntity;

/// A parsed invocation of a registry contract.
#[derive(Debug)]
pub enum EntryPoint<E: LedgerEntity> {
    InitLedger,
    Create { id: String, params: E::Create },
    Update { id: String, update: E::Update },
    Read { id: String },
    Index,
    Transactions { id: String },
}

impl<E> EntryPoint<E>
where
    E: LedgerEntity,
    E::Create: ContractArgs,
    E::Update: ContractArgs,
{
    pub fn parse(function: &str, args: &[String]) -> Result<Self, ContractError> {
        let expect = |expected: usize| {
            if args.len() == expected {
                Ok(())
            } else {
                Err(ContractError::InvalidArguments {
                    function: function.to_string(),
                    expected,
                    got: args.len(),
                })
            }
        };

        match function {
            "InitLedger" => {
                expect(0)?;
                Ok(Self::InitLedger)
            }
            "Create" => {
                expect(1 + E::Create::ARITY)?;
                Ok(Self::Create {
                    id: args[0].clone(),
                    params: E::Create::from_args(&args[1..]),
                })
            }
            "Update" => {
                expect(1 + E::Update::ARITY)?;
                Ok(Self::Update {
                    id: args[0].clone(),
                    update: E::Update::from_args(&args[1..]),
                })
            }
            "Read" => {
                expect(1)?;
                Ok(Self::Read { id: args[0].clone() })
            }
            "Index" => {
                expect(0)?;
                Ok(Self::Index)
            }
            "Transactions" => {
                expect(1)?;
                Ok(Self::Transactions { id: args[0].clone() })
            }
            other => Err(ContractError::UnknownFunction(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Resource, ResourceType};

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_parses_typed_parameters() {
        match EntryPoint::<Resource>::parse("Update", &args(&["r1", "", "rt2"])).unwrap() {
            EntryPoint::Update { id, update } => {
                assert_eq!(id, "r1");
                assert_eq!(update.name, None);
                assert_eq!(update.resource_type_id.as_deref(), Some("rt2"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_arity_is_exact() {
        let err = EntryPoint::<ResourceType>::parse("Read", &args(&["a", "b"])).unwrap_err();
        assert_eq!(
            err,
            ContractError::InvalidArguments {
                function: "Read".into(),
                expected: 1,
                got: 2,
            }
        );
        assert!(EntryPoint::<ResourceType>::parse("Index", &args(&["x"])).is_err());
        assert!(matches!(
            EntryPoint::<ResourceType>::parse("InitLedger", &[]),
            Ok(EntryPoint::InitLedger)
        ));
    }

    #[test]
    fn test_unknown_names_are_rejected() {
        let err = EntryPoint::<ResourceType>::parse("read", &args(&["rt1"])).unwrap_err();
        assert_eq!(err, ContractError::UnknownFunction("read".into()));
    }
}
