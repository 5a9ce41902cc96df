//! Confpatch core
//!
//! Format-preserving edits of `export default defineConfig({ ... })`
//! documents: merge a patch into the config object, remove properties by
//! path, or read the config object back as values. Text the edit does not
//! touch is reproduced byte-for-byte.
//!
//! Every operation parses its own input and returns new text; nothing is
//! shared between calls.

pub mod call;
pub mod error;
pub mod literal;
pub mod locate;
pub mod merge;
pub mod path;
pub mod read;
pub mod remove;
pub mod value;

pub use confpatch_syntax::{PrintOptions, QuoteStyle, SyntaxError};
pub use error::{PatchError, StructureError};
pub use locate::{locate, ConfigRoot};
pub use path::{PathKey, RemovalSpec};
pub use value::{ConfigValue, PatchSpec, CALL_MARKER};

use confpatch_syntax::{parse, print};

/// Applies edits with fixed presentation options for synthesized text.
#[derive(Debug, Clone, Default)]
pub struct Patcher {
    options: PrintOptions,
}

impl Patcher {
    pub fn new(options: PrintOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &PrintOptions {
        &self.options
    }

    /// Merge `patch` into the config root, or with `overwrite` replace the
    /// config root by an object built from `patch` alone.
    pub fn add_or_update(
        &self,
        text: &str,
        patch: &PatchSpec,
        overwrite: bool,
    ) -> Result<String, PatchError> {
        let document = parse(text)?;
        let root = locate(&document)?;
        let base = PathKey::root();
        let object = if overwrite {
            tracing::debug!(keys = patch.len(), "rebuilding config root from patch");
            literal::build_object(patch.entries(), &base)?
        } else {
            merge::merge_object(root.object(), patch.entries(), &base)?
        };
        Ok(print(&root.replace(object), &self.options))
    }

    /// Remove the properties at the given dotted paths.
    pub fn remove_properties<I, S>(&self, text: &str, paths: I) -> Result<String, PatchError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let spec = RemovalSpec::from_dotted(paths)?;
        self.remove(text, &spec)
    }

    pub fn remove(&self, text: &str, spec: &RemovalSpec) -> Result<String, PatchError> {
        let document = parse(text)?;
        let root = locate(&document)?;
        let object = remove::remove_properties(root.object(), spec, &PathKey::root());
        Ok(print(&root.replace(object), &self.options))
    }

    /// Read the config root as a [`ConfigValue::Object`].
    pub fn read_config(&self, text: &str) -> Result<ConfigValue, PatchError> {
        let document = parse(text)?;
        let root = locate(&document)?;
        Ok(ConfigValue::Object(read::read_object(root.object())))
    }
}

/// [`Patcher::add_or_update`] with default presentation options.
pub fn add_or_update(text: &str, patch: &PatchSpec, overwrite: bool) -> Result<String, PatchError> {
    Patcher::default().add_or_update(text, patch, overwrite)
}

/// [`Patcher::remove_properties`] with default presentation options.
pub fn remove_properties<I, S>(text: &str, paths: I) -> Result<String, PatchError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    Patcher::default().remove_properties(text, paths)
}

/// [`Patcher::read_config`] with default presentation options.
pub fn read_config(text: &str) -> Result<ConfigValue, PatchError> {
    Patcher::default().read_config(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const CONFIG: &str = "import { defineConfig } from 'cypress';\n\nexport default defineConfig({\n  e2e: {\n    video: true,\n  },\n});\n";

    #[test]
    fn test_add_or_update_round_trip() {
        let mut patch = PatchSpec::new();
        patch.insert_path("e2e.video", false).unwrap();
        patch.insert("baseUrl", "http://localhost:4200");
        assert_eq!(
            add_or_update(CONFIG, &patch, false).unwrap(),
            "import { defineConfig } from 'cypress';\n\nexport default defineConfig({\n  e2e: {\n    video: false,\n  },\n  baseUrl: 'http://localhost:4200',\n});\n"
        );
    }

    #[test]
    fn test_overwrite() {
        let mut patch = PatchSpec::new();
        patch.insert("baseUrl", "/");
        assert_eq!(
            add_or_update(CONFIG, &patch, true).unwrap(),
            "import { defineConfig } from 'cypress';\n\nexport default defineConfig({\n  baseUrl: '/',\n});\n"
        );
    }

    #[test]
    fn test_patcher_options() {
        let patcher = Patcher::new(
            PrintOptions::default()
                .with_quote(QuoteStyle::Double)
                .with_indent_width(4)
                .with_trailing_comma(false),
        );
        let mut patch = PatchSpec::new();
        patch.insert("baseUrl", "/");
        assert_eq!(
            patcher.add_or_update(CONFIG, &patch, true).unwrap(),
            "import { defineConfig } from 'cypress';\n\nexport default defineConfig({\n    baseUrl: \"/\"\n});\n"
        );
    }

    #[test]
    fn test_remove() {
        assert_eq!(
            remove_properties(CONFIG, ["e2e.video"]).unwrap(),
            "import { defineConfig } from 'cypress';\n\nexport default defineConfig({\n  e2e: {},\n});\n"
        );
    }

    #[test]
    fn test_errors_propagate() {
        let patch = PatchSpec::new();
        assert!(matches!(
            add_or_update("export default defineConfig({", &patch, false),
            Err(PatchError::Syntax(_))
        ));
        assert!(matches!(
            add_or_update("export const x = 1;", &patch, false),
            Err(PatchError::Structure(StructureError::NoDefaultExport))
        ));
        assert!(matches!(
            remove_properties(CONFIG, ["e2e..video"]),
            Err(PatchError::InvalidPath(_))
        ));
    }
}
