//! Rolldown plugin for Redwood Cells
//!
//! Runs the Cell wrapping transform on every JavaScript/TypeScript module the
//! bundler hands to the `transform` hook:
//!
//! ```text
//! PostsCell.jsx → transform() → CellTransformer → import + export default withRQCell({...})
//! ```
//!
//! Modules that are not Cells are passed through untouched (`Ok(None)`).
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use rqcell_plugin::RqCellPlugin;
//! use std::sync::Arc;
//!
//! let plugin = Arc::new(RqCellPlugin::new());
//! // Add to your Rolldown bundler configuration
//! ```

use std::borrow::Cow;
use std::path::Path;

use anyhow::Context;
use rolldown_common::ModuleType;
use rolldown_plugin::{
    HookTransformArgs, HookTransformOutput, HookTransformReturn, HookUsage, Plugin,
    SharedTransformPluginContext,
};
use rqcell_config::TransformSettings;
use rqcell_transform::{CellTransformer, CellWrapOptions};
use tracing::{debug, trace};

/// Which module ids the plugin looks at
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleFilter {
    extensions: Vec<String>,
    exclude: Vec<String>,
}

impl ModuleFilter {
    pub fn new(extensions: Vec<String>, exclude: Vec<String>) -> Self {
        let extensions = extensions
            .into_iter()
            .map(|ext| ext.trim_start_matches('.').to_string())
            .collect();
        Self {
            extensions,
            exclude,
        }
    }

    /// True when `id` has a handled extension and no excluded path segment.
    /// Query strings (`?raw`) are ignored.
    pub fn matches(&self, id: &str) -> bool {
        let path = id.split('?').next().unwrap_or(id);
        let path = Path::new(path);

        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            return false;
        };
        if !self.extensions.iter().any(|e| e == ext) {
            return false;
        }

        !path.components().any(|c| {
            let segment = c.as_os_str().to_string_lossy();
            self.exclude.iter().any(|ex| *ex == segment)
        })
    }
}

impl Default for ModuleFilter {
    fn default() -> Self {
        let settings = TransformSettings::default();
        Self::new(settings.extensions, settings.exclude)
    }
}

/// Rolldown plugin wrapping Cell modules in `withRQCell`
#[derive(Debug, Clone, Default)]
pub struct RqCellPlugin {
    options: CellWrapOptions,
    filter: ModuleFilter,
}

impl RqCellPlugin {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: CellWrapOptions) -> Self {
        Self {
            options,
            filter: ModuleFilter::default(),
        }
    }

    pub fn from_settings(settings: &TransformSettings) -> Self {
        Self {
            options: CellWrapOptions {
                import_source: settings.import_source.clone(),
                wrapper: settings.wrapper.clone(),
                single_quote: settings.single_quote,
            },
            filter: ModuleFilter::new(settings.extensions.clone(), settings.exclude.clone()),
        }
    }

    pub fn options(&self) -> &CellWrapOptions {
        &self.options
    }

    pub fn filter(&self) -> &ModuleFilter {
        &self.filter
    }

    /// Transform one module outside of a bundler run.
    ///
    /// Returns `Ok(None)` when the module is filtered out or is not a Cell.
    pub fn transform_module(&self, id: &str, code: &str) -> anyhow::Result<Option<String>> {
        if !self.filter.matches(id) {
            trace!(id, "not a script module, skipping");
            return Ok(None);
        }

        // Fresh transformer per module: hooks run concurrently.
        let mut transformer = CellTransformer::new(self.options.clone());
        let path = id.split('?').next().unwrap_or(id);
        let output = transformer
            .transform(path, code)
            .with_context(|| format!("Failed to transform Cell: {id}"))?;

        if !output.modified {
            return Ok(None);
        }
        debug!(id, diagnostics = ?output.diagnostics, "[rqcell] wrapped cell");
        Ok(Some(output.code))
    }
}

fn is_script(module_type: &ModuleType) -> bool {
    matches!(
        module_type,
        ModuleType::Js | ModuleType::Jsx | ModuleType::Ts | ModuleType::Tsx
    )
}

impl Plugin for RqCellPlugin {
    fn name(&self) -> Cow<'static, str> {
        Cow::Borrowed("rqcell:wrap-cells")
    }

    fn register_hook_usage(&self) -> HookUsage {
        HookUsage::Transform
    }

    fn transform(
        &self,
        _ctx: SharedTransformPluginContext,
        args: &HookTransformArgs<'_>,
    ) -> impl std::future::Future<Output = HookTransformReturn> + Send {
        let id = args.id.to_string();
        let code = args.code.to_string();
        let module_type = args.module_type.clone();
        let script = is_script(&module_type);
        let plugin = self.clone();

        async move {
            if !script {
                return Ok(None);
            }
            let Some(code) = plugin.transform_module(&id, &code)? else {
                return Ok(None);
            };
            Ok(Some(HookTransformOutput {
                code: Some(code),
                map: None,
                side_effects: None,
                module_type: None,
            }))
        }
    }
}
