//! Scripted `SourceClient` used by scraper and manager tests

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Map, Value, json};

use crate::error::FetchError;
use crate::models::{ListingPage, ListingRequest};
use crate::traits::SourceClient;

/// Serves listing pages from a scripted record list and synthesizes
/// detail pages.
///
/// Pages are cut by offset, like the real endpoint: page `n` of size `s`
/// holds records `(n - 1) * s .. n * s`. Clones share their request counters, so a test can hand one clone to a
/// scraper and inspect the other.
#[derive(Clone, Default)]
pub struct ScriptedClient {
    records: Vec<String>,
    failing_details: HashSet<String>,
    slow_details: HashSet<String>,
    failing_listing_page: Option<u32>,
    detail_delay: Duration,
    counters: Arc<Counters>,
}

#[derive(Default)]
struct Counters {
    page_sizes: Mutex<Vec<usize>>,
    detail_requests: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

struct InFlight<'a>(&'a Counters);

impl<'a> InFlight<'a> {
    fn enter(counters: &'a Counters) -> Self {
        let now = counters.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        counters.max_in_flight.fetch_max(now, Ordering::SeqCst);
        Self(counters)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

impl ScriptedClient {
    /// Records with explicit project numbers
    pub fn with_records(records: &[&str]) -> Self {
        Self {
            records: records.iter().map(|id| (*id).to_string()).collect(),
            ..Self::default()
        }
    }

    /// Generated project numbers `P{page}-{n}`, laid out so that full pages
    /// of 15 line up with `sizes`
    pub fn with_page_sizes(sizes: &[usize]) -> Self {
        Self {
            records: sizes
                .iter()
                .enumerate()
                .flat_map(|(page, size)| (1..=*size).map(move |n| format!("P{}-{}", page + 1, n)))
                .collect(),
            ..Self::default()
        }
    }

    pub fn failing_detail(mut self, identifier: &str) -> Self {
        self.failing_details.insert(identifier.to_string());
        self
    }

    pub fn slow_detail(mut self, identifier: &str) -> Self {
        self.slow_details.insert(identifier.to_string());
        self
    }

    pub fn failing_listing_page(mut self, page_number: u32) -> Self {
        self.failing_listing_page = Some(page_number);
        self
    }

    pub fn with_detail_delay(mut self, delay: Duration) -> Self {
        self.detail_delay = delay;
        self
    }

    pub fn listing_requests(&self) -> usize {
        self.requested_page_sizes().len()
    }

    pub fn requested_page_sizes(&self) -> Vec<usize> {
        self.counters.page_sizes.lock().unwrap().clone()
    }

    pub fn detail_requests(&self) -> usize {
        self.counters.detail_requests.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.counters.max_in_flight.load(Ordering::SeqCst)
    }
}

pub fn detail_page(identifier: &str) -> String {
    format!(
        "<html><body>\n\
         <div>Project Name: Project {identifier}</div>\n\
         <div>Location Address: 100 Main St, Austin, TX 78701</div>\n\
         <div>Location County: Travis</div>\n\
         <div>Estimated Cost: $1,000,000</div>\n\
         <div>Square Footage:</div>\n<div>12,000 ft 2</div>\n\
         <div>Registration Date: 2026-01-15</div>\n\
         </body></html>"
    )
}

#[async_trait]
impl SourceClient for ScriptedClient {
    async fn fetch_listing(&self, request: &ListingRequest) -> Result<ListingPage, FetchError> {
        self.counters
            .page_sizes
            .lock()
            .unwrap()
            .push(request.page_size);

        if self.failing_listing_page == Some(request.page_number) {
            return Err(FetchError::Status(500));
        }

        let offset = (request.page_number as usize - 1) * request.page_size;
        let data: Vec<Map<String, Value>> = self
            .records
            .iter()
            .skip(offset)
            .take(request.page_size)
            .map(|id| {
                json!({"ProjectNumber": id, "ProjectName": format!("Listing {id}")})
                    .as_object()
                    .cloned()
                    .unwrap()
            })
            .collect();

        Ok(ListingPage {
            data,
            total_records: Some(self.records.len() as u64),
        })
    }

    async fn fetch_detail(&self, identifier: &str) -> Result<String, FetchError> {
        self.counters.detail_requests.fetch_add(1, Ordering::SeqCst);
        let _guard = InFlight::enter(&self.counters);

        if self.slow_details.contains(identifier) {
            tokio::time::sleep(Duration::from_secs(5)).await;
        } else if !self.detail_delay.is_zero() {
            tokio::time::sleep(self.detail_delay).await;
        } else {
            tokio::task::yield_now().await;
        }

        if self.failing_details.contains(identifier) {
            return Err(FetchError::Status(404));
        }

        Ok(detail_page(identifier))
    }
}
