//! Knowledge article converter.

use std::io::Write;
use std::path::{Path, PathBuf};

use md2sf_config::Config;
use md2sf_lint::{
    CommandLinter, CommandSpellChecker, Misspelling, ProseLinter, QualityGate, SpellCheck, Verdict,
};
use md2sf_renderer::{AssetInliner, KnowledgeBackend, MarkdownRenderer, RenderResult};
use pulldown_cmark::{Options, Parser};

use crate::error::ConvertError;

/// Result of converting one article.
#[derive(Clone, Debug)]
pub struct Conversion {
    /// Rendered HTML fragment.
    pub html: String,
    /// Sibling `.html` path the fragment belongs to.
    pub output: PathBuf,
    /// Spellcheck warnings. Empty when the stage is disabled.
    pub misspellings: Vec<Misspelling>,
    /// Number of images rendered.
    pub images: usize,
    /// Number of code blocks rendered.
    pub code_blocks: usize,
}

/// Markdown to Salesforce Knowledge converter.
///
/// Runs the optional quality gate and spellcheck stage, then renders with
/// [`KnowledgeBackend`].
#[derive(Debug)]
pub struct KbConverter {
    gfm: bool,
    raw_html: bool,
    embed_images: bool,
    front_matter: bool,
    gate: QualityGate,
    spellcheck: Option<SpellCheck>,
}

impl Default for KbConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl KbConverter {
    /// Create a converter with default settings and no checks.
    #[must_use]
    pub fn new() -> Self {
        Self {
            gfm: true,
            raw_html: false,
            embed_images: true,
            front_matter: false,
            gate: QualityGate::disabled(),
            spellcheck: None,
        }
    }

    /// Create a converter from loaded configuration.
    ///
    /// Enabled checks run the configured external commands.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        let mut converter = Self::new()
            .gfm(config.render.gfm)
            .raw_html(config.render.raw_html)
            .embed_images(config.render.embed_images)
            .front_matter(config.render.front_matter);

        if config.lint.enabled {
            converter = converter
                .linter(CommandLinter::new(&config.lint.command).with_args(&config.lint.args));
        }
        if config.spellcheck.enabled {
            let checker = CommandSpellChecker::new(&config.spellcheck.command)
                .with_args(&config.spellcheck.args);
            converter = converter.spellchecker(
                SpellCheck::new(checker).with_allowlist(&config.spellcheck.allowlist),
            );
        }
        converter
    }

    /// Enable or disable GitHub Flavored Markdown features.
    #[must_use]
    pub fn gfm(mut self, enabled: bool) -> Self {
        self.gfm = enabled;
        self
    }

    /// Pass raw HTML through instead of escaping it.
    #[must_use]
    pub fn raw_html(mut self, enabled: bool) -> Self {
        self.raw_html = enabled;
        self
    }

    /// Enable or disable embedding local images as `data:` URIs.
    #[must_use]
    pub fn embed_images(mut self, enabled: bool) -> Self {
        self.embed_images = enabled;
        self
    }

    /// Strip a leading YAML front matter block.
    ///
    /// Off by default: a `---` line, prose, then another `---` is ordinary
    /// article content (a rule followed by a setext heading).
    #[must_use]
    pub fn front_matter(mut self, enabled: bool) -> Self {
        self.front_matter = enabled;
        self
    }

    /// Gate conversion on `linter` reporting nothing.
    #[must_use]
    pub fn linter(mut self, linter: impl ProseLinter + 'static) -> Self {
        self.gate = QualityGate::new(linter);
        self
    }

    /// Run `spellcheck` and report its findings as warnings.
    #[must_use]
    pub fn spellchecker(mut self, spellcheck: SpellCheck) -> Self {
        self.spellcheck = Some(spellcheck);
        self
    }

    fn parser_options(&self) -> Options {
        let mut options = Options::empty();
        if self.front_matter {
            options.insert(Options::ENABLE_YAML_STYLE_METADATA_BLOCKS);
        }
        if self.gfm {
            options.insert(Options::ENABLE_TABLES);
            options.insert(Options::ENABLE_STRIKETHROUGH);
            options.insert(Options::ENABLE_TASKLISTS);
            options.insert(Options::ENABLE_FOOTNOTES);
        }
        options
    }

    /// Render markdown to a Knowledge HTML fragment.
    ///
    /// Relative image paths are resolved against `base_dir` first, then the
    /// working directory.
    #[must_use]
    pub fn render_str(&self, markdown: &str, base_dir: Option<&Path>) -> String {
        self.render(markdown, base_dir).html
    }

    fn render(&self, markdown: &str, base_dir: Option<&Path>) -> RenderResult {
        let mut assets = AssetInliner::new().enabled(self.embed_images);
        if let Some(dir) = base_dir {
            assets = assets.with_base_dir(dir);
        }

        let parser = Parser::new_ext(markdown, self.parser_options());
        MarkdownRenderer::new(KnowledgeBackend::new(assets))
            .with_raw_html(self.raw_html)
            .render(parser)
    }

    /// Convert the article at `path`.
    ///
    /// Nothing is written; pass the result to [`write_output`].
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError`] if the file cannot be read, the quality gate
    /// fails, or a check cannot be run.
    pub fn convert_file(&self, path: &Path) -> Result<Conversion, ConvertError> {
        let output = output_path(path);
        if output == path {
            return Err(ConvertError::OutputIsInput(path.to_path_buf()));
        }

        let markdown = std::fs::read_to_string(path).map_err(|source| ConvertError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        if let Verdict::Findings(findings) = self.gate.check(path)? {
            return Err(ConvertError::LintFailure(findings));
        }

        let misspellings = match &self.spellcheck {
            Some(spellcheck) => spellcheck.check(&markdown, self.front_matter)?,
            None => Vec::new(),
        };
        for m in &misspellings {
            tracing::warn!(path = %path.display(), line = m.line, word = %m.word, "Possible misspelling");
        }

        let base_dir = path.parent().filter(|p| !p.as_os_str().is_empty());
        let result = self.render(&markdown, base_dir);
        tracing::info!(
            path = %path.display(),
            images = result.images,
            code_blocks = result.code_blocks,
            "Converted article"
        );

        Ok(Conversion {
            html: result.html,
            output,
            misspellings,
            images: result.images,
            code_blocks: result.code_blocks,
        })
    }
}

/// Output path for an article: the same path with an `html` extension.
#[must_use]
pub fn output_path(path: &Path) -> PathBuf {
    path.with_extension("html")
}

/// Write `html` to `path` atomically.
///
/// Content goes to a temporary file in the target directory which is then
/// renamed over `path`, so a failed write never leaves a partial file.
///
/// # Errors
///
/// Returns [`ConvertError::Write`] if the file cannot be created or persisted.
pub fn write_output(path: &Path, html: &str) -> Result<(), ConvertError> {
    let write_err = |source| ConvertError::Write {
        path: path.to_path_buf(),
        source,
    };

    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let mut file = tempfile::NamedTempFile::new_in(dir).map_err(write_err)?;
    file.write_all(html.as_bytes()).map_err(write_err)?;
    file.persist(path).map_err(|e| write_err(e.error))?;

    tracing::debug!(path = %path.display(), bytes = html.len(), "Wrote output");
    Ok(())
}
