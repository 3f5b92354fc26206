use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::embed::{Encoding, LinkBuilder};
use crate::parser::{self, assemble, rewrite, sections};
use crate::settings::Settings;
use crate::walk::{self, Outcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    /// Copy Auftrag sections into a questions file.
    Extract,
    /// Rebuild a questions file with links and one reflection block.
    Convert,
    /// Regenerate links inside the Lehrmittel document itself.
    Rewrite,
}

/// One utility configured for one run.
pub struct Pipeline<'a> {
    pub tool: Tool,
    pub settings: &'a Settings,
    pub encoding: Encoding,
    pub dry_run: bool,
}

impl Pipeline<'_> {
    /// Exact filename this utility looks for.
    pub fn input_name(&self) -> &str {
        match self.tool {
            Tool::Extract | Tool::Rewrite => &self.settings.source_file,
            Tool::Convert => &self.settings.questions_file,
        }
    }

    pub fn process(&self, path: &Path) -> Result<Outcome> {
        println!("Processing: {}", path.display());
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        match self.tool {
            Tool::Extract => self.extract(path, &content),
            Tool::Convert => self.convert(path, &content),
            Tool::Rewrite => self.rewrite(path, &content),
        }
    }

    fn extract(&self, path: &Path, content: &str) -> Result<Outcome> {
        let Some(text) = sections::extract_sections(content) else {
            println!("No matching sections found in {}", path.display());
            return Ok(Outcome::Skipped);
        };
        let target = path.with_file_name(&self.settings.questions_file);
        self.emit(&target, &text)?;
        println!("Extracted content saved to: {}", target.display());
        Ok(Outcome::Written)
    }

    fn convert(&self, path: &Path, content: &str) -> Result<Outcome> {
        let records = parser::parse_document(content);
        if records.is_empty() {
            println!("No subId blocks found in {}", path.display());
            return Ok(Outcome::Skipped);
        }

        let text = assemble::assemble(&records, &self.links(path));
        let target = path.with_file_name(&self.settings.converted_file);
        self.emit(&target, &text)?;
        info!(
            "Converted {} records ({} with reflection)",
            records.len(),
            records.iter().filter(|r| !r.reflection.is_empty()).count()
        );
        println!("New file created: {}", target.display());
        Ok(Outcome::Written)
    }

    fn rewrite(&self, path: &Path, content: &str) -> Result<Outcome> {
        let rewritten = rewrite::rewrite(content, &self.links(path));
        if rewritten.records == 0 {
            println!("No Auftrag blocks found in {}", path.display());
            return Ok(Outcome::Skipped);
        }

        self.emit(path, &rewritten.text)?;
        info!(
            "Rewrote {} records, relocated {} reflection blocks",
            rewritten.records, rewritten.relocated
        );
        println!("Processed file: {}", path.display());
        Ok(Outcome::Written)
    }

    fn links(&self, path: &Path) -> LinkBuilder {
        LinkBuilder::new(&self.settings.endpoint, walk::assignment_id(path), self.encoding)
    }

    fn emit(&self, target: &Path, text: &str) -> Result<()> {
        if self.dry_run {
            info!("Dry run: would write {} bytes to {}", text.len(), target.display());
            return Ok(());
        }
        fs::write(target, text).with_context(|| format!("Failed to write {}", target.display()))?;
        info!("Wrote {}", target.display());
        Ok(())
    }
}

// ── Tests ──
