//! Workspace: one analysis session plus its endpoint cache and configuration.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::warn;

use crate::analysis::AnalysisSession;
use crate::config::Config;
use crate::endpoints::{
    discover, CancellationFlag, DiscoveryReport, EndpointCache, EndpointDescriptor,
    EndpointExtractor, FileEvent, HttpMethod,
};
use crate::payload::{PayloadNode, PayloadSynthesizer};
use crate::schema::{DtoRef, FieldDescriptor, SchemaResolver};

/// A query parameter pre-filled for a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryParam {
    pub key: String,
    pub value: String,
}

/// What a request panel is opened with for an endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct RequestPreview {
    pub method: HttpMethod,
    pub route: String,
    pub handler: String,
    /// Example body, for verbs that carry one and a known DTO.
    pub payload: Option<PayloadNode>,
    pub query_params: Vec<QueryParam>,
    pub table_name: Option<String>,
}

pub struct Workspace {
    root: PathBuf,
    config: Config,
    session: AnalysisSession,
    cache: EndpointCache,
    synthesizer: PayloadSynthesizer,
}

impl Workspace {
    pub fn open<P: AsRef<Path>>(root: P, config: Config) -> Self {
        let session = AnalysisSession::open(&config);
        let synthesizer = PayloadSynthesizer::new().with_max_depth(config.payload_max_depth);
        Self {
            root: root.as_ref().to_path_buf(),
            config,
            session,
            cache: EndpointCache::new(),
            synthesizer,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn session(&self) -> &AnalysisSession {
        &self.session
    }

    pub fn cache(&self) -> &EndpointCache {
        &self.cache
    }

    /// Endpoints of a file, from the cache when fresh.
    ///
    /// Files that cannot be loaded yield no endpoints and are not cached.
    pub fn endpoints<P: AsRef<Path>>(&mut self, path: P) -> Vec<EndpointDescriptor> {
        let path = path.as_ref();
        if let Some(cached) = self.cache.get(path) {
            return cached.to_vec();
        }

        let extractor = EndpointExtractor::new(&self.session, &self.config.conventions);
        match extractor.try_extract(path) {
            Ok(endpoints) => {
                self.cache.put(path, endpoints.clone());
                endpoints
            }
            Err(e) => {
                warn!(error = %e, "cannot extract endpoints");
                Vec::new()
            }
        }
    }

    /// The endpoint a cursor on `line` (1-indexed) selects.
    pub fn endpoint_at<P: AsRef<Path>>(&mut self, path: P, line: usize) -> Option<EndpointDescriptor> {
        self.endpoints(path)
            .into_iter()
            .find(|endpoint| endpoint.matches_cursor(line))
    }

    pub fn fields(&self, dto: &DtoRef) -> Vec<FieldDescriptor> {
        SchemaResolver::new(&self.session).resolve(dto)
    }

    pub fn synthesize(&self, fields: &[FieldDescriptor]) -> PayloadNode {
        let resolver = SchemaResolver::new(&self.session);
        self.synthesizer.synthesize(fields, &resolver, 0)
    }

    pub fn payload_for(&self, dto: &DtoRef) -> PayloadNode {
        let resolver = SchemaResolver::new(&self.session);
        self.synthesizer.synthesize_for(dto, &resolver)
    }

    pub fn request_preview(&self, endpoint: &EndpointDescriptor) -> RequestPreview {
        let payload = match &endpoint.request_body {
            Some(dto) if endpoint.http_method.expects_body() => Some(self.payload_for(dto)),
            _ => None,
        };

        RequestPreview {
            method: endpoint.http_method,
            route: endpoint.route.clone(),
            handler: endpoint.handler.clone(),
            payload,
            query_params: endpoint
                .query_params
                .iter()
                .map(|key| QueryParam {
                    key: key.clone(),
                    value: String::new(),
                })
                .collect(),
            table_name: endpoint.table_name.clone(),
        }
    }

    /// Apply a file-change notification to the cache and session.
    pub fn notify(&mut self, event: &FileEvent) {
        self.cache.apply(event);
        self.session.evict(event.path());
    }

    /// Analyze unsaved editor text for `path` instead of the disk file.
    pub fn set_buffer<P: AsRef<Path>>(&mut self, path: P, text: impl Into<String>) {
        let path = path.as_ref();
        self.session.set_buffer(path, text);
        self.cache.invalidate(path);
    }

    pub fn clear_buffer<P: AsRef<Path>>(&mut self, path: P) {
        let path = path.as_ref();
        self.session.clear_buffer(path);
        self.cache.invalidate(path);
    }

    /// Discover every controller under the workspace root.
    pub async fn discover<F>(
        &mut self,
        cancel: &CancellationFlag,
        progress: F,
    ) -> anyhow::Result<DiscoveryReport>
    where
        F: FnMut(&Path, usize, usize),
    {
        discover(
            &self.root,
            &self.config,
            &self.session,
            &mut self.cache,
            cancel,
            progress,
        )
        .await
    }

    /// Release the session and cache.
    pub fn dispose(self) {
        self.session.dispose();
    }
}
