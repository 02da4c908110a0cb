//! # Struct Schema
//!
//! Named scalar members plus the [`StructLayout`] computed from them.

use eyre::Result;

use crate::error::FlatError;
use crate::layout::{StructLayout, StructMember};
use crate::schema::types::ScalarType;

#[derive(Debug, Clone)]
pub struct StructSchema {
    name: String,
    members: Vec<(String, ScalarType)>,
    layout: StructLayout,
}

impl StructSchema {
    pub fn new<I, N>(name: impl Into<String>, members: I) -> Result<Self>
    where
        I: IntoIterator<Item = (N, ScalarType)>,
        N: Into<String>,
    {
        let name = name.into();
        let members: Vec<(String, ScalarType)> =
            members.into_iter().map(|(n, t)| (n.into(), t)).collect();

        for (i, (member, _)) in members.iter().enumerate() {
            if members[..i].iter().any(|(prev, _)| prev == member) {
                return Err(FlatError::schema_mismatch(format!(
                    "duplicate struct member {}.{}",
                    name, member
                )));
            }
        }

        let layout = StructLayout::new(
            members
                .iter()
                .map(|(_, t)| StructMember::scalar(t.size()))
                .collect(),
        )?;

        Ok(Self {
            name,
            members,
            layout,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn layout(&self) -> &StructLayout {
        &self.layout
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    pub fn member_index(&self, name: &str) -> Option<usize> {
        self.members.iter().position(|(n, _)| n == name)
    }

    pub fn member_type(&self, idx: usize) -> Option<ScalarType> {
        self.members.get(idx).map(|(_, t)| *t)
    }

    pub fn members(&self) -> impl ExactSizeIterator<Item = (&str, ScalarType)> {
        self.members.iter().map(|(n, t)| (n.as_str(), *t))
    }
}
