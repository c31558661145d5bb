use std::sync::Arc;

use tera::{Context, Tera};

use crate::errors::AppError;

/// Server-side page templates, loaded once at startup.
#[derive(Clone)]
pub struct Templates {
    tera: Arc<Tera>,
}

impl Templates {
    pub fn load(dir: &str) -> Result<Self, tera::Error> {
        let pattern = format!("{}/**/*.html", dir.trim_end_matches('/'));
        let mut tera = Tera::new(&pattern)?;
        tera.autoescape_on(vec![".html"]);

        tracing::info!(
            "Loaded {} templates from {}",
            tera.get_template_names().count(),
            dir
        );

        Ok(Templates { tera: Arc::new(tera) })
    }

    pub fn render(&self, name: &str, context: &Context) -> Result<String, AppError> {
        self.tera.render(name, context).map_err(|e| {
            tracing::error!(template = name, "Template rendering failed: {:?}", e);
            AppError::from(e)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn templates() -> Templates {
        Templates::load(concat!(env!("CARGO_MANIFEST_DIR"), "/templates")).expect("templates load")
    }

    #[test]
    fn renders_static_pages() {
        let templates = templates();
        let mut context = Context::new();
        context.insert("site_name", "Portfolio");
        context.insert("is_admin", &false);
        context.insert("flashes", &Vec::<String>::new());

        for page in ["index.html", "about.html", "contact.html"] {
            let html = templates.render(page, &context).expect("page renders");
            assert!(html.contains("Portfolio"));
        }
    }

    #[test]
    fn unknown_template_is_an_error() {
        let err = templates().render("missing.html", &Context::new()).unwrap_err();
        assert!(matches!(err, AppError::Template(_)));
    }
}
