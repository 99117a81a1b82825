// Chart domain model - hourly bars, scales and the keyed data-join
use super::ridership::Record;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::hash::Hash;

const E10: f64 = 7.0710678118654755; // sqrt(50)
const E5: f64 = 3.1622776601683795; // sqrt(10)
const E2: f64 = std::f64::consts::SQRT_2;

/// One bar of the hourly chart, keyed by `hour`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bar {
    pub hour: u32,
    pub count: u64,
}

impl Bar {
    pub fn tooltip(&self) -> String {
        format!("Hour: {}:00\nTrips: {}", self.hour, self.count)
    }
}

/// One bar per record, in view order. Hours may repeat.
pub fn bars_for(filtered: &[&Record]) -> Vec<Bar> {
    filtered
        .iter()
        .map(|record| Bar {
            hour: record.hour,
            count: record.count,
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Categorical scale mapping keys to evenly spaced bands
#[derive(Debug, Clone, PartialEq)]
pub struct BandScale<K> {
    domain: Vec<K>,
    range: (f64, f64),
    padding: f64,
    start: f64,
    step: f64,
}

impl<K: PartialEq + Clone> BandScale<K> {
    /// Duplicate keys keep their first position. `padding` applies both
    /// between bands and at the outer edges, bands are centred in the range.
    pub fn new(keys: impl IntoIterator<Item = K>, range: (f64, f64), padding: f64) -> Self {
        let mut domain: Vec<K> = Vec::new();
        for key in keys {
            if !domain.contains(&key) {
                domain.push(key);
            }
        }

        let padding = padding.clamp(0.0, 1.0);
        let (r0, r1) = range;
        let n = domain.len() as f64;
        let step = (r1 - r0) / f64::max(1.0, n - padding + padding * 2.0);
        let start = r0 + (r1 - r0 - step * (n - padding)) * 0.5;

        Self {
            domain,
            range,
            padding,
            start,
            step,
        }
    }

    pub fn domain(&self) -> &[K] {
        &self.domain
    }

    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    pub fn bandwidth(&self) -> f64 {
        self.step * (1.0 - self.padding)
    }

    pub fn position(&self, key: &K) -> Option<f64> {
        self.domain
            .iter()
            .position(|k| k == key)
            .map(|i| self.start + self.step * i as f64)
    }

    pub fn center(&self, key: &K) -> Option<f64> {
        self.position(key).map(|x| x + self.bandwidth() / 2.0)
    }
}

/// Continuous scale from a numeric domain onto pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    /// Extend the domain outward to round tick boundaries
    pub fn nice(mut self, count: usize) -> Self {
        let (mut start, mut stop) = self.domain;
        let mut previous_step: Option<f64> = None;

        for _ in 0..10 {
            let step = tick_increment(start, stop, count);
            if !step.is_finite() || previous_step == Some(step) {
                break;
            } else if step > 0.0 {
                start = (start / step).floor() * step;
                stop = (stop / step).ceil() * step;
            } else if step < 0.0 {
                start = (start * step).ceil() / step;
                stop = (stop * step).floor() / step;
            } else {
                break;
            }
            previous_step = Some(step);
        }

        self.domain = (start, stop);
        self
    }

    /// A degenerate domain maps everything onto the start of the range
    pub fn scale(&self, value: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let span = d1 - d0;
        if span == 0.0 || !span.is_finite() {
            return r0;
        }
        r0 + (value - d0) / span * (r1 - r0)
    }

    pub fn ticks(&self, count: usize) -> Vec<f64> {
        let (start, stop) = self.domain;
        if count == 0 {
            return Vec::new();
        }
        if start == stop {
            return vec![start];
        }

        let step = tick_increment(start, stop, count);
        if step == 0.0 || !step.is_finite() {
            return Vec::new();
        }

        if step > 0.0 {
            let first = (start / step).ceil() as i64;
            let last = (stop / step).floor() as i64;
            (first..=last).map(|i| i as f64 * step).collect()
        } else {
            let inverse = -step;
            let first = (start * inverse).ceil() as i64;
            let last = (stop * inverse).floor() as i64;
            (first..=last).map(|i| i as f64 / inverse).collect()
        }
    }

    /// Label for a tick value, with thousands separators and just enough
    /// decimals for the tick step
    pub fn tick_format(&self, count: usize, value: f64) -> String {
        let (start, stop) = self.domain;
        let step = tick_step(start, stop, count).abs();
        let precision = if step > 0.0 && step.is_finite() {
            (-step.log10().floor()).max(0.0) as usize
        } else {
            0
        };
        group_thousands(&format!("{:.*}", precision, value))
    }
}

/// Positive values are a step size, negative values the inverse of one
fn tick_increment(start: f64, stop: f64, count: usize) -> f64 {
    let step = (stop - start) / count.max(1) as f64;
    let power = step.log10().floor();
    let error = step / 10f64.powf(power);
    let factor = if error >= E10 {
        10.0
    } else if error >= E5 {
        5.0
    } else if error >= E2 {
        2.0
    } else {
        1.0
    };
    if power < 0.0 {
        -10f64.powf(-power) / factor
    } else {
        factor * 10f64.powf(power)
    }
}

fn tick_step(start: f64, stop: f64, count: usize) -> f64 {
    let increment = tick_increment(start.min(stop), start.max(stop), count);
    if increment < 0.0 {
        1.0 / -increment
    } else {
        increment
    }
}

fn group_thousands(formatted: &str) -> String {
    let (sign, unsigned) = match formatted.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", formatted),
    };
    let (integer, fraction) = match unsigned.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (unsigned, None),
    };

    let mut grouped = String::with_capacity(formatted.len() + integer.len() / 3);
    for (i, digit) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    match fraction {
        Some(f) => format!("{}{}.{}", sign, grouped, f),
        None => format!("{}{}", sign, grouped),
    }
}

/// Pixel layout of the chart canvas
#[derive(Debug, Clone, PartialEq)]
pub struct ChartLayout {
    pub width: f64,
    pub height: f64,
    pub margin_top: f64,
    pub margin_right: f64,
    pub margin_bottom: f64,
    pub margin_left: f64,
    pub padding: f64,
    pub ticks: usize,
}

impl Default for ChartLayout {
    fn default() -> Self {
        Self {
            width: 600.0,
            height: 400.0,
            margin_top: 20.0,
            margin_right: 20.0,
            margin_bottom: 40.0,
            margin_left: 50.0,
            padding: 0.2,
            ticks: 10,
        }
    }
}

impl ChartLayout {
    pub fn baseline(&self) -> f64 {
        self.height - self.margin_bottom
    }

    pub fn x_scale(&self, bars: &[Bar]) -> BandScale<u32> {
        BandScale::new(
            bars.iter().map(|b| b.hour),
            (self.margin_left, self.width - self.margin_right),
            self.padding,
        )
    }

    pub fn y_scale(&self, bars: &[Bar]) -> LinearScale {
        let max = bars.iter().map(|b| b.count).max().unwrap_or(0) as f64;
        LinearScale::new((0.0, max), (self.baseline(), self.margin_top)).nice(self.ticks)
    }

    /// Final geometry of a bar
    pub fn bar_rect(&self, bar: &Bar, x: &BandScale<u32>, y: &LinearScale) -> Rect {
        let top = y.scale(bar.count as f64);
        Rect {
            x: x.position(&bar.hour).unwrap_or(self.margin_left),
            y: top,
            width: x.bandwidth(),
            height: (self.baseline() - top).max(0.0),
        }
    }

    /// Zero-height geometry an entering bar grows from
    pub fn entering_rect(&self, bar: &Bar, x: &BandScale<u32>, y: &LinearScale) -> Rect {
        Rect {
            x: x.position(&bar.hour).unwrap_or(self.margin_left),
            y: y.scale(0.0),
            width: x.bandwidth(),
            height: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Joined<T> {
    Enter(T),
    Update { previous: T, current: T },
}

/// Reconciliation of previously drawn items against a new set, by key
#[derive(Debug, Clone, PartialEq)]
pub struct DataJoin<T> {
    /// Entering and updating items, in the order of the new data
    pub entries: Vec<Joined<T>>,
    pub exit: Vec<T>,
}

impl<T: Clone> DataJoin<T> {
    /// Items whose key repeats within `next` are treated as entering
    pub fn compute<K, F>(previous: &[T], next: &[T], key: F) -> Self
    where
        K: Eq + Hash,
        F: Fn(&T) -> K,
    {
        let mut by_key: HashMap<K, usize> = HashMap::new();
        for (i, item) in previous.iter().enumerate() {
            by_key.entry(key(item)).or_insert(i);
        }

        let mut matched: HashSet<usize> = HashSet::new();
        let entries = next
            .iter()
            .map(|item| match by_key.get(&key(item)) {
                Some(&i) if matched.insert(i) => Joined::Update {
                    previous: previous[i].clone(),
                    current: item.clone(),
                },
                _ => Joined::Enter(item.clone()),
            })
            .collect();

        let exit = previous
            .iter()
            .enumerate()
            .filter(|(i, _)| !matched.contains(i))
            .map(|(_, item)| item.clone())
            .collect();

        Self { entries, exit }
    }
}
