//! Serializable summary of a generation run, for `widgen inspect`.

use serde::Serialize;
use widgen_catalog::canonical_name;

use crate::classify::AttributeKind;
use crate::nullability::Nullability;
use crate::types::java_type;
use crate::Generation;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Report {
    pub root: String,
    /// Classes that received factories, with their DSL names.
    pub classes: Vec<ClassReport>,
    pub attributes: Vec<AttributeReport>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ClassReport {
    pub name: String,
    pub factory: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AttributeReport {
    pub name: String,
    pub declarations: Vec<DeclarationReport>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DeclarationReport {
    pub class: String,
    pub method: String,
    pub kind: AttributeKind,
    pub value_type: String,
    pub nullability: Nullability,
}

impl Report {
    pub(crate) fn new(generation: &Generation) -> Self {
        let classes = generation
            .document
            .factories()
            .map(|f| ClassReport {
                name: canonical_name(&f.class),
                factory: f.function_name.clone(),
            })
            .collect();
        let attributes = generation
            .groups
            .iter()
            .map(|group| AttributeReport {
                name: group.name.clone(),
                declarations: group
                    .candidates
                    .iter()
                    .map(|c| DeclarationReport {
                        class: canonical_name(&c.declaring_class),
                        method: c.method_name.clone(),
                        kind: c.kind,
                        value_type: java_type(&c.value_type),
                        nullability: c.nullability,
                    })
                    .collect(),
            })
            .collect();
        Self {
            root: canonical_name(&generation.root),
            classes,
            attributes,
        }
    }
}

impl std::fmt::Display for Report {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "root: {}", self.root)?;
        writeln!(f, "classes ({}):", self.classes.len())?;
        for class in &self.classes {
            writeln!(f, "  {} -> {}", class.name, class.factory)?;
        }
        writeln!(f, "attributes ({}):", self.attributes.len())?;
        for attribute in &self.attributes {
            writeln!(f, "  {}", attribute.name)?;
            for decl in &attribute.declarations {
                let kind = match decl.kind {
                    AttributeKind::Setter => "",
                    AttributeKind::Listener => " [listener]",
                };
                writeln!(
                    f,
                    "    {}.{}({}){kind}",
                    decl.class, decl.method, decl.value_type
                )?;
            }
        }
        Ok(())
    }
}
