//! Inventory builder

use tracing::{debug, trace};

use super::resolver::{DnsResolver, HostResolver};
use super::tags::group_name;
use super::InventoryError;
use crate::models::{HostVars, Inventory, Resource};

/// Builds an [`Inventory`] from cluster resources.
///
/// When a resolver is present every guest also gets an `ansible_host`;
/// a failed lookup aborts the whole build.
#[derive(Clone, Debug, Default)]
pub struct InventoryBuilder<R = DnsResolver> {
    resolver: Option<R>,
}

impl InventoryBuilder<DnsResolver> {
    /// Builder using the system resolver when `resolve_ip` is set
    pub fn new(resolve_ip: bool) -> Self {
        if resolve_ip {
            Self::with_resolver(DnsResolver)
        } else {
            Self { resolver: None }
        }
    }
}

impl<R: HostResolver> InventoryBuilder<R> {
    pub fn with_resolver(resolver: R) -> Self {
        Self {
            resolver: Some(resolver),
        }
    }

    pub fn resolves_ip(&self) -> bool {
        self.resolver.is_some()
    }

    pub async fn build(&self, resources: &[Resource]) -> Result<Inventory, InventoryError> {
        let mut inventory = Inventory::new();

        for resource in resources.iter().filter(|r| r.is_guest()) {
            trace!("Guest record: {:?}", resource);

            let name = required(resource, resource.name.as_deref(), "name")?;
            let node = required(resource, resource.node.as_deref(), "node")?;

            let ansible_host = match &self.resolver {
                Some(resolver) => Some(resolver.resolve(name).await?),
                None => None,
            };

            inventory.set_hostvars(
                name,
                HostVars {
                    proxmox_host: node.to_string(),
                    ansible_host,
                },
            );
            trace!("Hostvars for {}: {:?}", name, inventory.hostvars(name));

            for tag in resource.raw_tags() {
                let group = group_name(tag);
                trace!("Final tag: {}", group);

                if inventory.add_child(&group) {
                    trace!("Adding group: {}", group);
                }
                if inventory.ensure_group(&group) {
                    trace!("Creating group: {}", group);
                }
                inventory.push_host(&group, name);
            }
        }

        debug!(
            "Built inventory with {} hosts in {} groups",
            inventory.hostvars_len(),
            inventory.children().len()
        );

        Ok(inventory)
    }
}

fn required<'a>(
    resource: &Resource,
    value: Option<&'a str>,
    field: &'static str,
) -> Result<&'a str, InventoryError> {
    value.ok_or_else(|| InventoryError::MissingField {
        id: resource.label(),
        field,
    })
}
