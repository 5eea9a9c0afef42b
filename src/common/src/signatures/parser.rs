use crate::signatures::match_condition::{CaseInsensitiveRegex, MatchCondition};
use crate::signatures::Signature;
use crate::yaml::{Yaml, YamlExt};
use anyhow::{bail, Result};

impl TryFrom<Yaml> for Signature {
    type Error = anyhow::Error;

    fn try_from(yaml: Yaml) -> Result<Self> {
        let id = yaml.required_string("id")?;
        let category = yaml.required_string("category")?;
        let risk = yaml.required_string("risk")?.parse()?;
        let description = yaml.required_string("description")?;
        let condition = yaml.required("condition")?.try_into()?;
        Ok(Signature {
            id,
            category,
            risk,
            description,
            condition,
        })
    }
}

impl TryFrom<&Yaml> for MatchCondition {
    type Error = anyhow::Error;

    fn try_from(yaml: &Yaml) -> Result<Self> {
        const SIMPLE_TYPES: &[&str] = &[
            "process_name_is",
            "process_name_contains",
            "command_contains",
            "command_matches_regex",
            "api_hostname",
        ];

        for simple_type in SIMPLE_TYPES {
            if let Some(val) = yaml.optional(simple_type) {
                let pattern = val.to_string()?;
                if pattern.is_empty() {
                    bail!("Empty pattern for {}", simple_type);
                }
                return match *simple_type {
                    "process_name_is" => Ok(MatchCondition::ProcessNameIs(pattern.to_lowercase())),
                    "process_name_contains" => Ok(MatchCondition::ProcessNameContains(
                        pattern.to_lowercase(),
                    )),
                    "command_contains" => {
                        Ok(MatchCondition::CommandContains(pattern.to_lowercase()))
                    }
                    "command_matches_regex" => Ok(MatchCondition::CommandMatchesRegex(
                        CaseInsensitiveRegex::new(&pattern)?,
                    )),
                    "api_hostname" => Ok(MatchCondition::ApiHostname(pattern.to_lowercase())),
                    _ => bail!("Invalid simple condition type: {}", simple_type),
                };
            }
        }

        const COMPOUND_TYPES: &[&str] = &["and", "or"];
        for compound_type in COMPOUND_TYPES {
            if let Some(conditions_yml) = yaml.optional_vec(compound_type)? {
                let conditions = conditions_yml
                    .iter()
                    .map(|condition| condition.try_into())
                    .collect::<Result<Vec<_>>>()?;
                return match *compound_type {
                    "and" => Ok(MatchCondition::And(conditions)),
                    "or" => Ok(MatchCondition::Or(conditions)),
                    _ => bail!("Unknown condition type: {:?}", compound_type),
                };
            }
        }

        bail!("Unrecognized condition: {:?}", yaml);
    }
}
