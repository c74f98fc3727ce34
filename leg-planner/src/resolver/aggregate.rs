//! Grouping head segments into transport options.
//!
//! Several itineraries usually start with the same line at different
//! times. The traveler picks a line first and a time second, so we fold
//! segments into one option per `(product, line)` with a list of times.

use std::collections::HashMap;

use tracing::trace;

use crate::domain::{TimeSlot, TransportOption, group_key};

use super::segment::CleanedSegment;

/// Group segments into transport options.
///
/// - Segments without origin, destination, line, departure or arrival are
///   skipped; they cannot be shown or committed safely.
/// - The first segment seen for a key seeds origin, destination and
///   direction.
/// - Each option's times are sorted by departure and deduplicated by their
///   `HH:MM` rendering.
/// - Options come out in first-seen order.
pub fn group<'a, I>(segments: I) -> Vec<TransportOption>
where
    I: IntoIterator<Item = &'a CleanedSegment>,
{
    let mut options: Vec<TransportOption> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for segment in segments {
        let leg = &segment.leg;
        let (Some(line), Some(origin), Some(destination), Some(departure), Some(arrival)) = (
            leg.line.as_ref(),
            leg.origin.as_ref(),
            leg.destination.as_ref(),
            leg.departure,
            leg.arrival,
        ) else {
            trace!("skipping incomplete segment");
            continue;
        };

        let slot = TimeSlot::new(departure, arrival)
            .with_platform(leg.departure_platform.clone())
            .with_refresh_token(segment.refresh_token.clone());

        let key = group_key(line.product, &line.name);
        match index.get(&key) {
            Some(&i) => options[i].times.push(slot),
            None => {
                index.insert(key, options.len());
                options.push(TransportOption {
                    line: line.name.clone(),
                    product: line.product,
                    direction: leg.direction.clone(),
                    origin: origin.clone(),
                    destination: destination.clone(),
                    times: vec![slot],
                });
            }
        }
    }

    for option in &mut options {
        option.sort_and_dedup_times();
    }

    options
}
