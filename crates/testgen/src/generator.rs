use bto_core::Operation;
use chrono::{DateTime, Local};
use rand::distr::{Distribution, Uniform};
use rand::{Rng, RngExt};
use rayon::iter::{IntoParallelIterator, ParallelIterator};
use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

#[derive(Clone, Debug, Default, Deserialize, Serialize, TypedBuilder)]
pub struct HistParams {
    pub id: u64,
    pub n_transaction: u64,
    pub n_item: u64,
    /// Reads and writes per transaction, commit excluded.
    pub n_operation: u64,
}

#[derive(Deserialize, Serialize, Debug)]
pub struct History {
    params: HistParams,
    info: String,
    start: DateTime<Local>,
    end: DateTime<Local>,
    data: Vec<Operation>,
}

impl History {
    #[must_use]
    pub const fn new(
        params: HistParams,
        info: String,
        start: DateTime<Local>,
        end: DateTime<Local>,
        data: Vec<Operation>,
    ) -> Self {
        Self {
            params,
            info,
            start,
            end,
            data,
        }
    }

    #[must_use]
    pub const fn get_id(&self) -> u64 {
        self.params.id
    }

    #[must_use]
    pub const fn get_data(&self) -> &Vec<Operation> {
        &self.data
    }

    #[must_use]
    pub const fn get_params(&self) -> &HistParams {
        &self.params
    }
}

/// Item name for `index`: `a`..`z`, then `aa`, `ab`, ...
#[must_use]
pub fn item_name(index: u64) -> String {
    let mut name = Vec::new();
    let mut rest = index;
    loop {
        // `rest % 26` always fits in a u8
        name.push(b'a' + u8::try_from(rest % 26).unwrap_or(0));
        if rest < 26 {
            break;
        }
        rest = rest / 26 - 1;
    }
    name.reverse();
    String::from_utf8(name).unwrap_or_default()
}

/// Generate a random history with `n_transaction` transactions over
/// `n_item` items, drawing randomness from `rng`.
///
/// Each transaction issues `n_operation` random reads and writes followed by
/// its commit. Transactions are interleaved at random while each keeps its
/// own order, so every commit comes after all of its transaction's accesses.
/// With no items, transactions consist of their commit only.
pub fn generate_history_with<R: Rng + ?Sized>(
    rng: &mut R,
    n_transaction: u64,
    n_item: u64,
    n_operation: u64,
) -> Vec<Operation> {
    let item_range = Uniform::new(0, n_item).ok();

    let mut programs: Vec<std::vec::IntoIter<Operation>> = (1..=n_transaction)
        .map(|id| {
            let mut program: Vec<Operation> = match &item_range {
                Some(range) => (0..n_operation)
                    .map(|_| {
                        let item = item_name(range.sample(rng));
                        if rng.random::<bool>() {
                            Operation::read(id, item)
                        } else {
                            Operation::write(id, item)
                        }
                    })
                    .collect(),
                None => Vec::new(),
            };
            program.push(Operation::commit(id));
            program.into_iter()
        })
        .collect();

    let mut history = Vec::new();
    while !programs.is_empty() {
        let index = rng.random_range(0..programs.len());
        match programs[index].next() {
            Some(operation) => history.push(operation),
            None => {
                programs.swap_remove(index);
            }
        }
    }
    history
}

/// [`generate_history_with`] using the thread-local generator.
#[must_use]
pub fn generate_single_history(n_transaction: u64, n_item: u64, n_operation: u64) -> Vec<Operation> {
    generate_history_with(&mut rand::rng(), n_transaction, n_item, n_operation)
}

#[must_use]
pub fn generate_mult_histories(
    n_hist: u64,
    n_transaction: u64,
    n_item: u64,
    n_operation: u64,
) -> Vec<History> {
    (0..n_hist)
        .into_par_iter()
        .map(|i_hist| {
            let start_time = Local::now();
            let hist = generate_single_history(n_transaction, n_item, n_operation);
            let end_time = Local::now();
            let params = HistParams::builder()
                .id(i_hist)
                .n_transaction(n_transaction)
                .n_item(n_item)
                .n_operation(n_operation)
                .build();
            History::new(params, "generated".to_string(), start_time, end_time, hist)
        })
        .collect()
}
