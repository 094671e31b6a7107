use std::sync::Arc;

use adapter::database::ConnectionPool;
use adapter::notifier::WebhookNotifier;
use adapter::repository::health::HealthCheckRepositoryImpl;
use adapter::repository::policy::PolicyRepositoryImpl;
use adapter::repository::reservation::ReservationRepositoryImpl;
use adapter::repository::space::SpaceRepositoryImpl;
use kernel::notifier::NotificationGateway;
use kernel::repository::health::HealthCheckRepository;
use kernel::repository::policy::PolicyRepository;
use kernel::repository::reservation::ReservationRepository;
use kernel::repository::space::SpaceRepository;
use shared::config::AppConfig;

#[derive(Clone)]
pub struct AppRegistry {
    health_check_repository: Arc<dyn HealthCheckRepository>,
    space_repository: Arc<dyn SpaceRepository>,
    reservation_repository: Arc<dyn ReservationRepository>,
    policy_repository: Arc<dyn PolicyRepository>,
    notification_gateway: Arc<dyn NotificationGateway>,
}

impl AppRegistry {
    pub fn new(pool: ConnectionPool, app_config: &AppConfig) -> Self {
        let health_check_repository = Arc::new(HealthCheckRepositoryImpl::new(pool.clone()));
        let space_repository = Arc::new(SpaceRepositoryImpl::new(pool.clone()));
        let reservation_repository = Arc::new(ReservationRepositoryImpl::new(pool.clone()));
        let policy_repository = Arc::new(PolicyRepositoryImpl::new(pool.clone()));
        let notification_gateway = Arc::new(WebhookNotifier::new(&app_config.notifier));
        Self {
            health_check_repository,
            space_repository,
            reservation_repository,
            policy_repository,
            notification_gateway,
        }
    }

    pub fn health_check_repository(&self) -> Arc<dyn HealthCheckRepository> {
        self.health_check_repository.clone()
    }

    pub fn space_repository(&self) -> Arc<dyn SpaceRepository> {
        self.space_repository.clone()
    }

    pub fn reservation_repository(&self) -> Arc<dyn ReservationRepository> {
        self.reservation_repository.clone()
    }

    pub fn policy_repository(&self) -> Arc<dyn PolicyRepository> {
        self.policy_repository.clone()
    }

    pub fn notification_gateway(&self) -> Arc<dyn NotificationGateway> {
        self.notification_gateway.clone()
    }
}
