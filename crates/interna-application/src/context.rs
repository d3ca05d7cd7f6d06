//! Client context.
//!
//! Bundles the session and every entity service so views receive their
//! dependencies explicitly. Each context is independent; tests build as
//! many as they need.

use crate::entity_service::EntityService;
use crate::session_service::SessionService;
use anyhow::Result;
use interna_core::access::RouteTable;
use interna_core::config::ClientConfig;
use interna_core::entity::attendance::AttendanceRecord;
use interna_core::entity::evaluation::Evaluation;
use interna_core::entity::notification::Notification;
use interna_core::entity::reclamation::Reclamation;
use interna_core::entity::task::Task;
use interna_core::identity::Authenticator;
use interna_core::session::SessionRepository;
use interna_core::store::EntityGateway;
use interna_infrastructure::{FileSessionRepository, InternaPaths};
use std::sync::Arc;

/// One gateway per entity kind.
pub struct Gateways {
    pub tasks: Arc<dyn EntityGateway<Task>>,
    pub attendance: Arc<dyn EntityGateway<AttendanceRecord>>,
    pub evaluations: Arc<dyn EntityGateway<Evaluation>>,
    pub reclamations: Arc<dyn EntityGateway<Reclamation>>,
    pub notifications: Arc<dyn EntityGateway<Notification>>,
}

#[derive(Clone)]
pub struct ClientContext {
    pub session: SessionService,
    pub tasks: EntityService<Task>,
    pub attendance: EntityService<AttendanceRecord>,
    pub evaluations: EntityService<Evaluation>,
    pub reclamations: EntityService<Reclamation>,
    pub notifications: EntityService<Notification>,
}

impl ClientContext {
    /// Wires the entity services to `session`. Every store is cleared when
    /// the session ends, whether by logout or by credential expiry.
    pub fn new(session: SessionService, gateways: Gateways) -> Self {
        let context = Self {
            tasks: EntityService::new(gateways.tasks, session.clone()),
            attendance: EntityService::new(gateways.attendance, session.clone()),
            evaluations: EntityService::new(gateways.evaluations, session.clone()),
            reclamations: EntityService::new(gateways.reclamations, session.clone()),
            notifications: EntityService::new(gateways.notifications, session.clone()),
            session,
        };
        context.session.register_scoped(context.tasks.store());
        context.session.register_scoped(context.attendance.store());
        context.session.register_scoped(context.evaluations.store());
        context.session.register_scoped(context.reclamations.store());
        context.session.register_scoped(context.notifications.store());
        context
    }

    /// Builds a context backed by the on-disk session slot and restores the
    /// previous session.
    pub async fn bootstrap(
        config: &ClientConfig,
        paths: &InternaPaths,
        authenticator: Arc<dyn Authenticator>,
        gateways: Gateways,
    ) -> Result<Self> {
        let repository: Arc<dyn SessionRepository> = match &config.session.file {
            Some(file) => Arc::new(FileSessionRepository::with_path(file)),
            None => Arc::new(FileSessionRepository::new(paths)?),
        };
        let session = SessionService::new(repository, authenticator, RouteTable::standard());
        let context = Self::new(session, gateways);
        context.session.restore().await;
        tracing::info!("[Bootstrap] Client context ready ({})", config.api_base_url);
        Ok(context)
    }

    /// Logs out. The registered stores are cleared by the session.
    pub async fn logout(&self) {
        self.session.logout().await;
    }
}
