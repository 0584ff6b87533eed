//! Generic response expansion.
//!
//! Every deferred [`ResponseWrapper`] is instantiated once per record already
//! in the registry: the wrapper's placeholder is substituted by the record
//! name and the result is registered under the formatted name template.

use crate::declarations::ResponseWrapper;
use crate::error::{ExpandError, ExpandResult};
use crate::registry::SchemaRegistry;
use crate::resolver::{Substitutions, TypeResolver};

/// Knobs for [`expand_responses`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExpandOptions {
    /// Reject name templates without a `%s` slot instead of letting every
    /// instantiation collapse onto one name.
    pub strict_templates: bool,
}

/// Expand all wrappers over the records currently registered.
///
/// Returns the number of instantiations performed, which is
/// `wrappers.len() * records` where `records` is the registry size before
/// expansion. Names produced by expansion are not expanded again.
pub fn expand_responses(
    registry: &mut SchemaRegistry,
    wrappers: &[ResponseWrapper],
    resolver: &TypeResolver,
    options: ExpandOptions,
) -> ExpandResult<usize> {
    for wrapper in wrappers {
        if wrapper.directive.has_name_slot() {
            continue;
        }
        if options.strict_templates {
            return Err(ExpandError::MissingNameSlot {
                wrapper: wrapper.name.clone(),
                template: wrapper.directive.name.clone(),
            });
        }
        tracing::warn!(
            wrapper = %wrapper.name,
            template = %wrapper.directive.name,
            "Name template has no %s slot, all instantiations share one name"
        );
    }

    let models = registry.names();
    let mut expanded = 0;

    for wrapper in wrappers {
        let placeholder = &wrapper.directive.placeholder;

        for model in &models {
            let subs = Substitutions::from([(placeholder.clone(), model.clone())]);
            let schema = resolver.resolve_record(&wrapper.fields, Some(&subs));
            let name = wrapper.directive.schema_name(model);

            tracing::debug!(wrapper = %wrapper.name, model = %model, schema = %name, "Expanded response");
            registry.insert(name, schema);
            expanded += 1;
        }
    }

    Ok(expanded)
}
