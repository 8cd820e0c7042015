//! Operation extension entry point
//!
//! For one route, locate the handler, read its override comments, and for
//! each capability the handler enables, resolve the allowed values and
//! attach the synthesized query parameters to the operation.

use crate::call_site::find_call_site;
use crate::docblock::parse_comment;
use crate::inference::InferenceEngine;
use crate::loader::UnitLoader;
use crate::synthesis::Synthesizer;
use crate::unit::SourceUnit;
use qbdoc_core::config::{Config, ParameterKeys};
use qbdoc_core::error::{Error, Result};
use qbdoc_core::feature::features;
use qbdoc_core::hooks::HookRegistry;
use qbdoc_core::openapi::{Operation, Parameter};
use qbdoc_core::route::RouteInfo;
use serde_json::Value;
use tracing::{debug, trace};

/// Documents query builder parameters on route operations
pub struct Extension {
    keys: ParameterKeys,
    annotation_tag: String,
    loader: Box<dyn UnitLoader>,
    hooks: HookRegistry,
    synthesizer: Synthesizer,
}

impl Extension {
    pub fn new(config: &Config, loader: Box<dyn UnitLoader>, hooks: HookRegistry) -> Self {
        Self {
            keys: config.parameters.clone(),
            annotation_tag: config.annotations.tag.clone(),
            loader,
            hooks,
            synthesizer: Synthesizer::new(&config.synthesis),
        }
    }

    /// Replace the synthesizer, e.g. to pin the date used for examples
    pub fn with_synthesizer(mut self, synthesizer: Synthesizer) -> Self {
        self.synthesizer = synthesizer;
        self
    }

    pub fn hooks_mut(&mut self) -> &mut HookRegistry {
        &mut self.hooks
    }

    /// Build a fresh operation for a route
    pub fn document(&mut self, route: &RouteInfo) -> Result<Operation> {
        let mut operation = Operation::new(route.uses.clone());
        self.handle(&mut operation, route)?;
        Ok(operation)
    }

    /// Add parameters for the route's handler to `operation`
    ///
    /// Fails only when the controller unit or the handler method cannot be
    /// found; everything past that point degrades to fewer parameters.
    pub fn handle(&mut self, operation: &mut Operation, route: &RouteInfo) -> Result<()> {
        let (controller, method) = route.controller_and_method()?;
        let unit = self.loader.load_declaring_unit(controller)?;
        self.handle_unit(operation, &unit, controller, method)
    }

    /// Same as [`Extension::handle`] for a unit the caller already parsed
    pub fn handle_unit(
        &mut self,
        operation: &mut Operation,
        unit: &SourceUnit,
        owner_type: &str,
        method: &str,
    ) -> Result<()> {
        let handler = unit
            .handler(Some(owner_type), method)
            .ok_or_else(|| Error::method_not_found(owner_type, method))?;

        let overrides = unit
            .doc_comment(handler)
            .map(|raw| parse_comment(&raw, &self.annotation_tag))
            .unwrap_or_default();
        debug!(
            unit = unit.label(),
            class = owner_type,
            method,
            overrides = overrides.len(),
            "documenting handler"
        );

        let engine = InferenceEngine::new(self.loader.as_ref());

        for mut feature in features(&self.keys) {
            let Some(call_site) = find_call_site(handler, unit.source(), feature.kind, owner_type)
            else {
                trace!(feature = %feature.kind, "capability not used");
                continue;
            };

            let values = engine.resolve(&call_site);
            let descriptors = self.synthesizer.synthesize(&feature, &values, &overrides);

            if !feature.kind.is_keyed() {
                let examples = descriptors
                    .iter()
                    .flat_map(|d| d.examples.iter().filter_map(Value::as_str))
                    .map(str::to_string)
                    .collect();
                feature.set_values(examples);
            }

            let mut added = 0;
            for descriptor in &descriptors {
                let parameter = Parameter::from_descriptor(descriptor);
                if self.hooks.run(operation, &parameter, &feature).is_break() {
                    debug!(parameter = %parameter.name, "parameter vetoed by hook");
                    continue;
                }
                operation.add_parameters([parameter]);
                added += 1;
            }

            debug!(
                feature = %feature.kind,
                values = values.len(),
                parameters = added,
                "documented capability"
            );
        }

        Ok(())
    }
}

impl std::fmt::Debug for Extension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Extension")
            .field("keys", &self.keys)
            .field("annotation_tag", &self.annotation_tag)
            .field("hooks", &self.hooks)
            .finish_non_exhaustive()
    }
}
