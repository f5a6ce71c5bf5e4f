//! Discovery — log in, enumerate robots, and build the registry.
//!
//! Discovery runs once at startup. Every failure here is survivable: a
//! failed login yields an empty registry (the process keeps running), and
//! a robot whose maps or boundaries cannot be fetched is still registered
//! with whatever regions were obtained before the failure.

use robovac_domain::boundary::BoundaryRegion;
use robovac_domain::error::RobovacError;
use robovac_domain::id::Serial;

use crate::ports::RobotGateway;
use crate::registry::Registry;
use crate::representation::HiddenServices;

/// Authorize against the cloud and register every robot on the account,
/// with one room per cleanable region across all persisted maps.
#[tracing::instrument(skip_all)]
pub async fn discover<G: RobotGateway>(
    gateway: &G,
    email: &str,
    password: &str,
    hidden: &HiddenServices,
) -> Registry {
    let mut registry = Registry::default();

    tracing::debug!("loading robots");
    if let Err(err) = gateway.authorize(email, password).await {
        let err = RobovacError::Auth(err);
        tracing::error!(
            %err,
            "cannot log on to the robot cloud, check your connection and credentials"
        );
        return registry;
    }

    let robots = match gateway.list_robots().await {
        Ok(robots) => robots,
        Err(err) => {
            tracing::error!(%err, "successful login but cannot reach the robots");
            return registry;
        }
    };

    if robots.is_empty() {
        tracing::error!("successful login but no robots associated with this account");
        return registry;
    }
    tracing::debug!(count = robots.len(), "found robots");

    for robot in robots {
        tracing::info!(
            name = %robot.name,
            serial = %robot.serial.masked(),
            "found robot"
        );
        let boundaries = fetch_boundaries(gateway, &robot.serial).await;
        registry.register(robot, boundaries, hidden);
    }

    registry
}

/// Collect the cleanable regions of one robot across all its maps.
/// Failures are logged and yield whatever was fetched so far.
async fn fetch_boundaries<G: RobotGateway>(gateway: &G, serial: &Serial) -> Vec<BoundaryRegion> {
    let maps = match gateway.list_maps(serial).await {
        Ok(maps) => maps,
        Err(err) => {
            let err = RobovacError::Discovery {
                serial: serial.clone(),
                source: err,
            };
            tracing::error!(%err, "error updating persistent maps");
            return Vec::new();
        }
    };

    let mut regions = Vec::new();
    for map in maps {
        match gateway.list_boundaries(serial, &map).await {
            Ok(boundaries) => {
                regions.extend(boundaries.into_iter().filter(BoundaryRegion::is_cleanable));
            }
            Err(err) => {
                let err = RobovacError::Discovery {
                    serial: serial.clone(),
                    source: err,
                };
                tracing::error!(map = %map, %err, "error getting boundaries");
            }
        }
    }
    regions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeGateway;
    use robovac_domain::boundary::BoundaryKind;
    use robovac_domain::id::MapId;
    use robovac_domain::robot::Robot;

    fn gateway_with_one_robot() -> FakeGateway {
        let gateway = FakeGateway::default();
        gateway.robots.lock().unwrap().push(
            Robot::builder()
                .serial("OPS1")
                .name("Rosie")
                .build()
                .unwrap(),
        );
        gateway
    }

    #[tokio::test]
    async fn should_yield_empty_registry_when_login_fails() {
        let gateway = gateway_with_one_robot();
        gateway.fail_on("authorize");

        let registry = discover(&gateway, "a@b.c", "pw", &HiddenServices::default()).await;

        assert!(registry.is_empty());
        assert_eq!(gateway.call_count("list_robots"), 0);
    }

    #[tokio::test]
    async fn should_yield_empty_registry_when_robot_listing_fails() {
        let gateway = gateway_with_one_robot();
        gateway.fail_on("list_robots");

        let registry = discover(&gateway, "a@b.c", "pw", &HiddenServices::default()).await;
        assert!(registry.is_empty());
    }

    #[tokio::test]
    async fn should_register_robot_with_polygon_rooms_only() {
        let gateway = gateway_with_one_robot();
        let map = MapId::new("map-1");
        gateway.maps.lock().unwrap().push(map.clone());
        gateway.boundaries.lock().unwrap().insert(
            map,
            vec![
                BoundaryRegion::new("b-1", "Kitchen", BoundaryKind::Polygon),
                BoundaryRegion::new("b-2", "Keep out", BoundaryKind::Polyline),
                BoundaryRegion::new("b-3", "Bedroom", BoundaryKind::Polygon),
            ],
        );

        let registry = discover(&gateway, "a@b.c", "pw", &HiddenServices::default()).await;

        assert_eq!(registry.len(), 1);
        let unit = registry.get(&Serial::new("OPS1")).unwrap();
        let names: Vec<_> = unit
            .rooms
            .iter()
            .map(|room| room.region.name.as_str())
            .collect();
        assert_eq!(names, vec!["Kitchen", "Bedroom"]);
    }

    #[tokio::test]
    async fn should_keep_robot_when_map_listing_fails() {
        let gateway = gateway_with_one_robot();
        gateway.fail_on("list_maps");

        let registry = discover(&gateway, "a@b.c", "pw", &HiddenServices::default()).await;

        assert_eq!(registry.len(), 1);
        assert!(
            registry
                .get(&Serial::new("OPS1"))
                .unwrap()
                .rooms
                .is_empty()
        );
    }

    #[tokio::test]
    async fn should_keep_robot_when_boundary_listing_fails() {
        let gateway = gateway_with_one_robot();
        gateway.maps.lock().unwrap().push(MapId::new("map-1"));
        gateway.fail_on("list_boundaries");

        let registry = discover(&gateway, "a@b.c", "pw", &HiddenServices::default()).await;

        assert_eq!(registry.len(), 1);
        assert!(
            registry
                .get(&Serial::new("OPS1"))
                .unwrap()
                .rooms
                .is_empty()
        );
    }
}
