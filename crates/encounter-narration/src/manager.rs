use std::fs;
use std::path::Path;

use minijinja::Environment;
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::NarrationError;
use crate::template::{BUILTIN_TEMPLATES, NarrationTemplate};

/// Template file extensions picked up by [`NarrationManager::load_dir`].
const TEMPLATE_EXTENSIONS: &[&str] = &["j2", "jinja"];

/// Manages narration templates and renders them with context variables.
///
/// # Examples
///
/// ```
/// use encounter_narration::NarrationManager;
///
/// let manager = NarrationManager::new();
/// let line = manager
///     .render("action", &serde_json::json!({ "actor": "Player One", "action": "attack" }))
///     .expect("built-in template should render");
///
/// assert_eq!(line, "Player One uses attack.");
/// ```
pub struct NarrationManager {
    env: Environment<'static>,
}

impl NarrationManager {
    /// Create a manager preloaded with [`BUILTIN_TEMPLATES`].
    pub fn new() -> Self {
        let mut env = Environment::new();
        for &(name, source) in BUILTIN_TEMPLATES {
            if let Err(e) = env.add_template(name, source) {
                warn!(template = name, error = %e, "skipping broken built-in template");
            }
        }
        Self { env }
    }

    /// Load every `.j2` / `.jinja` file under `dir`, overriding templates
    /// with the same name.
    ///
    /// The template name is the path relative to `dir` without its
    /// extension, using `/` separators: `outcome/player_defeated.j2` becomes
    /// `outcome/player_defeated`. Returns how many templates were loaded.
    ///
    /// # Errors
    ///
    /// Returns `NarrationError::Io` if the directory cannot be read.
    /// Returns `NarrationError::InvalidTemplate` if a file fails to parse.
    pub fn load_dir(&mut self, dir: &Path) -> Result<usize, NarrationError> {
        let mut loaded = 0;
        self.load_dir_recursive(dir, dir, &mut loaded)?;
        debug!(dir = %dir.display(), loaded, "loaded narration templates");
        Ok(loaded)
    }

    fn load_dir_recursive(
        &mut self,
        root: &Path,
        dir: &Path,
        loaded: &mut usize,
    ) -> Result<(), NarrationError> {
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.is_dir() {
                self.load_dir_recursive(root, &path, loaded)?;
                continue;
            }

            let is_template = path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|ext| TEMPLATE_EXTENSIONS.contains(&ext));
            if !is_template {
                continue;
            }

            let Ok(relative) = path.with_extension("").strip_prefix(root).map(Path::to_path_buf)
            else {
                continue;
            };
            let name = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");

            let source = fs::read_to_string(&path)?;
            self.add_template(NarrationTemplate::new(name, source))?;
            *loaded += 1;
        }
        Ok(())
    }

    /// Register a single template, replacing any template with that name.
    ///
    /// # Errors
    ///
    /// Returns `NarrationError::InvalidTemplate` if the source fails to
    /// parse.
    pub fn add_template(&mut self, template: NarrationTemplate) -> Result<(), NarrationError> {
        let NarrationTemplate { name, source } = template;
        self.env
            .add_template_owned(name.clone(), source)
            .map_err(|source| NarrationError::InvalidTemplate { name, source })
    }

    /// Returns true if a template is registered under `name`.
    pub fn has_template(&self, name: &str) -> bool {
        self.env.get_template(name).is_ok()
    }

    /// Render a template by name with the given context.
    ///
    /// # Errors
    ///
    /// Returns `NarrationError::TemplateNotFound` if no template has that
    /// name.
    /// Returns `NarrationError::Render` if rendering fails.
    pub fn render<S: Serialize>(&self, name: &str, ctx: &S) -> Result<String, NarrationError> {
        // templates are compiled when added, so lookup can only miss
        let template = self
            .env
            .get_template(name)
            .map_err(|_| NarrationError::TemplateNotFound(name.to_owned()))?;
        template.render(ctx).map_err(|source| NarrationError::Render {
            name: name.to_owned(),
            source,
        })
    }
}

impl Default for NarrationManager {
    fn default() -> Self {
        Self::new()
    }
}
