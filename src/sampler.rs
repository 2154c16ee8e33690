// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use rand::Rng;

use crate::types::quote::Quote;

/// The outcome of drawing from a pool.
#[derive(Debug, PartialEq)]
pub enum Draw {
    /// A quote was drawn; `pool` is the remainder.
    Drawn { quote: Quote, pool: Vec<Quote> },
    /// The pool was empty.
    Exhausted,
}

/// Draw one quote uniformly at random and remove it from the pool.
///
/// Removal shifts the tail of the vector, which is linear in the pool size.
/// Pools are a few thousand quotes at most, so this is fine.
pub fn draw<R: Rng>(mut pool: Vec<Quote>, rng: &mut R) -> Draw {
    if pool.is_empty() {
        return Draw::Exhausted;
    }
    let index = rng.gen_range(0..pool.len());
    let quote = pool.remove(index);
    Draw::Drawn { quote, pool }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::collections::HashSet;

    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::types::quote::QuoteId;
    use crate::types::quote::QuoteRecord;
    use crate::types::quote::SourceCollection;

    fn pool(n: usize) -> Vec<Quote> {
        (0..n)
            .map(|i| {
                Quote::from_record(
                    SourceCollection::V1,
                    i,
                    QuoteRecord::new(format!("quote {i}"), false, false),
                )
            })
            .collect()
    }

    #[test]
    fn test_empty_pool_is_exhausted() {
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(draw(Vec::new(), &mut rng), Draw::Exhausted);
    }

    #[test]
    fn test_draw_removes_quote() {
        let mut rng = StdRng::seed_from_u64(1);
        match draw(pool(4), &mut rng) {
            Draw::Drawn { quote, pool } => {
                assert_eq!(pool.len(), 3);
                assert!(!pool.contains(&quote));
            }
            Draw::Exhausted => panic!("expected a quote"),
        }
    }

    #[test]
    fn test_draining_yields_every_quote_once() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut remaining = pool(10);
        let mut drawn: HashSet<QuoteId> = HashSet::new();
        loop {
            match draw(remaining, &mut rng) {
                Draw::Drawn { quote, pool } => {
                    assert!(drawn.insert(quote.id().clone()));
                    remaining = pool;
                }
                Draw::Exhausted => break,
            }
        }
        assert_eq!(drawn.len(), 10);
    }

    #[test]
    fn test_roughly_uniform() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut counts: HashMap<QuoteId, usize> = HashMap::new();
        let trials = 4000;
        for _ in 0..trials {
            if let Draw::Drawn { quote, .. } = draw(pool(4), &mut rng) {
                *counts.entry(quote.id().clone()).or_default() += 1;
            }
        }
        assert_eq!(counts.len(), 4);
        for count in counts.values() {
            // Expected 1000 each.
            assert!(*count > 800 && *count < 1200, "count = {count}");
        }
    }
}
