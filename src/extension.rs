use crate::{
    collect,
    models::{ExceptionRecord, RequestSnapshot},
    panel::{render_panel, Panel},
    Formatter,
};
use log::debug;
use serde_json::Map;
use std::{fmt::Debug, sync::Arc};

/// Callback a host debugger invokes to render a panel for an error.
pub type PanelRenderer = Box<dyn Fn(Option<&ExceptionRecord>) -> Option<Panel> + Send + Sync>;

/// Provides the request the current error happened in, if any.
pub type RequestSource = Arc<dyn Fn() -> Option<RequestSnapshot> + Send + Sync>;

/// A debugging tool that shows panels next to an error.
pub trait PanelHost {
    /// Add a panel renderer. It is called every time the host shows an error.
    fn add_panel(&mut self, renderer: PanelRenderer);

    /// Version of the host, listed in the environment section of reports.
    fn version(&self) -> Option<String> {
        None
    }
}

/// Adds a "Copy Markdown" panel to a [`PanelHost`].
///
/// ```
/// use exception_markdown::{Extension, ExceptionRecord, PanelHost, PanelRenderer};
///
/// #[derive(Default)]
/// struct Host(Vec<PanelRenderer>);
///
/// impl PanelHost for Host {
///     fn add_panel(&mut self, renderer: PanelRenderer) {
///         self.0.push(renderer);
///     }
/// }
///
/// let mut host = Host::default();
/// let mut extension = Extension::default().with_request_source(|| None);
/// assert!(extension.register(&mut host));
/// assert!(!extension.register(&mut host));
/// assert_eq!(1, host.0.len());
///
/// let error = ExceptionRecord::new("Oops", "it broke", "src/main.rs", 1);
/// let panel = (host.0[0])(Some(&error)).unwrap();
/// assert_eq!("Copy Markdown", panel.title);
/// assert!((host.0[0])(None).is_none());
/// ```
pub struct Extension {
    formatter: Arc<Formatter>,
    request_source: RequestSource,
    registered: bool,
}

impl Default for Extension {
    fn default() -> Self {
        Self::new(Formatter::new())
    }
}

impl Debug for Extension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Extension")
            .field("formatter", &self.formatter)
            .field("registered", &self.registered)
            .finish()
    }
}

impl Extension {
    /// Create an extension formatting with `formatter`.
    ///
    /// Requests are collected from CGI variables of the current process, see
    /// [`collect::from_process_env`].
    pub fn new(formatter: Formatter) -> Self {
        Self {
            formatter: Arc::new(formatter),
            request_source: Arc::new(|| collect::from_process_env(Map::new())),
            registered: false,
        }
    }

    /// Set where the request of an error comes from.
    pub fn with_request_source<F>(mut self, source: F) -> Self
    where
        F: Fn() -> Option<RequestSnapshot> + Send + Sync + 'static,
    {
        self.request_source = Arc::new(source);
        self
    }

    /// Add the panel to `host`.
    ///
    /// Returns `false` without touching `host` if this extension was registered before.
    pub fn register<H: PanelHost + ?Sized>(&mut self, host: &mut H) -> bool {
        if self.registered {
            debug!("Panel is already registered");
            return false;
        }

        let formatter = match host.version() {
            Some(version) => {
                let name = self.formatter.options().debugger_name.clone();
                Arc::new(self.formatter.as_ref().clone().with_debugger(name, Some(version)))
            }
            None => Arc::clone(&self.formatter),
        };
        let request_source = Arc::clone(&self.request_source);
        host.add_panel(Box::new(move |exception: Option<&ExceptionRecord>| {
            let exception = exception?;
            let request = request_source();
            let markdown = formatter.format(exception, request.as_ref());
            Some(render_panel(&markdown))
        }));

        self.registered = true;
        true
    }

    /// Whether [`register`](Self::register) added the panel.
    pub fn is_registered(&self) -> bool {
        self.registered
    }

    /// Formatter used for reports.
    pub fn formatter(&self) -> &Formatter {
        &self.formatter
    }
}
