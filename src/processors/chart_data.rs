use crate::models::{RegionSeries, Variable};
use crate::utils::dates::add_one_year;
use chrono::{Datelike, NaiveDate};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartRequest {
    pub variables: Vec<Variable>,
    /// Inclusive lower bound on the calendar year
    pub since_year: Option<i32>,
}

impl ChartRequest {
    pub fn new(variables: Vec<Variable>) -> Self {
        Self {
            variables,
            since_year: None,
        }
    }

    pub fn single(variable: Variable) -> Self {
        Self::new(vec![variable])
    }

    pub fn since(mut self, year: i32) -> Self {
        self.since_year = Some(year);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlotSeries {
    pub name: String,
    pub units: Option<String>,
    pub points: Vec<(NaiveDate, f64)>,
}

/// Shared x-axis extent; never zero-width
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct XDomain {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl XDomain {
    /// Span the given dates; a single distinct date is widened by one year
    pub fn from_dates(dates: impl IntoIterator<Item = NaiveDate>) -> Option<Self> {
        let mut iter = dates.into_iter();
        let first = iter.next()?;
        let (start, end) = iter.fold((first, first), |(lo, hi), d| (lo.min(d), hi.max(d)));

        if start == end {
            Some(Self {
                start,
                end: add_one_year(start),
            })
        } else {
            Some(Self { start, end })
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartData {
    pub title: String,
    pub series: Vec<PlotSeries>,
    pub domain: XDomain,
}

impl ChartData {
    pub fn point_count(&self) -> usize {
        self.series.iter().map(|s| s.points.len()).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ChartOutcome {
    Ready(ChartData),
    NoData { message: String },
}

impl ChartOutcome {
    fn no_data(title: &str, since_year: Option<i32>) -> Self {
        let message = match since_year {
            Some(year) => format!("No data for {} since {}", title, year),
            None => format!("No data for {}", title),
        };
        ChartOutcome::NoData { message }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, ChartOutcome::Ready(_))
    }
}

/// Filters a series down to the points a chart needs
pub struct ChartPreparer;

impl ChartPreparer {
    pub fn prepare(series: &RegionSeries, request: &ChartRequest) -> ChartOutcome {
        let title = series.key.to_string();

        let mut variables = request.variables.clone();
        let mut seen = Vec::with_capacity(variables.len());
        variables.retain(|v| {
            let fresh = !seen.contains(v);
            seen.push(*v);
            fresh
        });

        let records: Vec<_> = series
            .records
            .iter()
            .filter(|r| in_range(r.date, request.since_year))
            .collect();

        if records.is_empty() || variables.is_empty() {
            return ChartOutcome::no_data(&title, request.since_year);
        }

        let plotted = variables
            .into_iter()
            .map(|variable| PlotSeries {
                name: variable.display_name().to_string(),
                units: Some(variable.units().to_string()),
                points: records
                    .iter()
                    .filter_map(|r| r.value(variable).map(|v| (r.date, v)))
                    .collect(),
            })
            .collect();

        match XDomain::from_dates(records.iter().map(|r| r.date)) {
            Some(domain) => ChartOutcome::Ready(ChartData {
                title,
                series: plotted,
                domain,
            }),
            None => ChartOutcome::no_data(&title, request.since_year),
        }
    }

    /// Same filtering for a free-standing variable (e.g. a `Meteorological Variables/` CSV)
    pub fn prepare_points(
        name: &str,
        points: &[(NaiveDate, f64)],
        since_year: Option<i32>,
    ) -> ChartOutcome {
        let mut filtered: Vec<(NaiveDate, f64)> = points
            .iter()
            .copied()
            .filter(|(date, _)| in_range(*date, since_year))
            .collect();
        filtered.sort_by_key(|(date, _)| *date);

        match XDomain::from_dates(filtered.iter().map(|(date, _)| *date)) {
            Some(domain) => ChartOutcome::Ready(ChartData {
                title: name.to_string(),
                series: vec![PlotSeries {
                    name: name.to_string(),
                    units: None,
                    points: filtered,
                }],
                domain,
            }),
            None => ChartOutcome::no_data(name, since_year),
        }
    }
}

fn in_range(date: NaiveDate, since_year: Option<i32>) -> bool {
    since_year.map_or(true, |year| date.year() >= year)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RegionKey, WeatherRecord};

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn series_spanning(years: std::ops::RangeInclusive<i32>) -> RegionSeries {
        let key = RegionKey::new("Punjab", "Amritsar", "Ajnala");
        let records = years
            .map(|y| {
                WeatherRecord::new("Punjab", "Amritsar", "Ajnala", ymd(y, 7, 1), 100.0, 38.0, 27.0)
            })
            .collect();
        RegionSeries::new(key, records)
    }

    #[test]
    fn test_since_year_filter() {
        let series = series_spanning(1980..=2020);
        let request = ChartRequest::single(Variable::Rainfall).since(2000);

        let ChartOutcome::Ready(chart) = ChartPreparer::prepare(&series, &request) else {
            panic!("expected chart data");
        };

        let points = &chart.series[0].points;
        assert_eq!(points.len(), 21);
        assert!(points.iter().all(|(d, _)| d.year() >= 2000));
        assert!(points.windows(2).all(|w| w[0].0 <= w[1].0));
        assert_eq!(chart.domain, XDomain { start: ymd(2000, 7, 1), end: ymd(2020, 7, 1) });
    }

    #[test]
    fn test_single_point_domain_widened() {
        let series = series_spanning(1995..=1995);
        let request = ChartRequest::single(Variable::MaxTemperature);

        let ChartOutcome::Ready(chart) = ChartPreparer::prepare(&series, &request) else {
            panic!("expected chart data");
        };
        assert_eq!(chart.domain.start, ymd(1995, 7, 1));
        assert_eq!(chart.domain.end, ymd(1996, 7, 1));
    }

    #[test]
    fn test_multiple_variables_share_domain() {
        let series = series_spanning(2001..=2003);
        let request = ChartRequest::new(vec![
            Variable::MaxTemperature,
            Variable::MinTemperature,
            Variable::MaxTemperature,
        ]);

        let ChartOutcome::Ready(chart) = ChartPreparer::prepare(&series, &request) else {
            panic!("expected chart data");
        };
        assert_eq!(chart.series.len(), 2);
        assert_eq!(chart.series[0].name, "Max Temperature");
        assert_eq!(chart.series[1].points[0].1, 27.0);
        assert_eq!(chart.point_count(), 6);
    }

    #[test]
    fn test_blank_readings_leave_gaps() {
        let mut series = series_spanning(2001..=2003);
        series.records[1].rainfall = None;

        let request = ChartRequest::single(Variable::Rainfall);
        let ChartOutcome::Ready(chart) = ChartPreparer::prepare(&series, &request) else {
            panic!("expected chart data");
        };
        let dates: Vec<NaiveDate> = chart.series[0].points.iter().map(|(d, _)| *d).collect();
        assert_eq!(dates, vec![ymd(2001, 7, 1), ymd(2003, 7, 1)]);
        assert_eq!(chart.domain.end, ymd(2003, 7, 1));
    }

    #[test]
    fn test_empty_range_is_no_data() {
        let series = series_spanning(1980..=1990);
        let request = ChartRequest::single(Variable::Rainfall).since(2000);
        let outcome = ChartPreparer::prepare(&series, &request);
        assert!(matches!(outcome, ChartOutcome::NoData { .. }));

        let outcome = ChartPreparer::prepare(&series, &ChartRequest::new(vec![]));
        assert!(!outcome.is_ready());
    }

    #[test]
    fn test_prepare_points() {
        let points = vec![
            (ymd(2012, 1, 1), 3.0),
            (ymd(2010, 1, 1), 1.0),
            (ymd(2011, 1, 1), 2.0),
        ];

        let outcome = ChartPreparer::prepare_points("Humidity", &points, Some(2011));
        let ChartOutcome::Ready(chart) = outcome else {
            panic!("expected chart data");
        };
        assert_eq!(
            chart.series[0].points,
            vec![(ymd(2011, 1, 1), 2.0), (ymd(2012, 1, 1), 3.0)]
        );

        assert!(!ChartPreparer::prepare_points("Humidity", &[], None).is_ready());
    }
}
