//! Status tree aggregation
//!
//! A container status owns one child watch per child reference. Children are
//! reconciled by name after every container result, so a child that stays in
//! the container keeps its watch (and its polling cadence) across polls.

use std::future::Future;
use std::pin::Pin;

use statusci_core::domain::status::{Status, StatusBody};

use super::poller::WatchHandle;
use crate::service::StatusResolver;
use crate::source::StatusSource;

/// Watch of one child reference
pub struct ChildWatch {
    /// Name of the child reference in the container
    pub name: String,
    pub handle: WatchHandle,
}

/// Child watches of one container, in container order
#[derive(Default)]
pub struct ChildWatches {
    entries: Vec<ChildWatch>,
}

impl ChildWatches {
    /// Aligns the watches with the children of a container
    ///
    /// Existing watches are kept, new children get a watch from `spawn`,
    /// children that disappeared are cancelled.
    pub fn reconcile(
        &mut self,
        parent: &StatusSource,
        children: &[Status],
        mut spawn: impl FnMut(StatusSource) -> WatchHandle,
    ) {
        let mut previous = std::mem::take(&mut self.entries);

        for child in children {
            match previous.iter().position(|entry| entry.name == child.name) {
                Some(pos) => self.entries.push(previous.remove(pos)),
                None => self.entries.push(ChildWatch {
                    name: child.name.clone(),
                    handle: spawn(parent.child(&child.name)),
                }),
            }
        }

        for stale in previous {
            stale.handle.cancel();
        }
    }

    /// Cancels and forgets every child watch
    pub fn clear(&mut self) {
        for entry in self.entries.drain(..) {
            entry.handle.cancel();
        }
    }

    pub fn find(&self, name: &str) -> Option<&WatchHandle> {
        self.entries
            .iter()
            .find(|entry| entry.name == name)
            .map(|entry| &entry.handle)
    }

    #[cfg(test)]
    pub fn handles(&self) -> Vec<WatchHandle> {
        self.entries.iter().map(|entry| entry.handle.clone()).collect()
    }
}

/// Resolves a source once, recursing into every child of a container
pub fn resolve_tree<'a>(
    resolver: &'a StatusResolver,
    source: StatusSource,
) -> Pin<Box<dyn Future<Output = Status> + Send + 'a>> {
    Box::pin(async move {
        let mut status = resolver.resolve_or_placeholder(&source, None).await;

        if let StatusBody::Container(children) = &mut status.body {
            for child in children.iter_mut() {
                *child = resolve_tree(resolver, source.child(&child.name)).await;
            }
        }

        status
    })
}
