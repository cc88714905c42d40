use pandrs_groupagg::column::{Float64Column, Int64Column, StringColumn};
use pandrs_groupagg::{AggFunc, Aggregation, DataFrame, GroupKeySpec, Grouping, Scalar};

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

fn sample() -> DataFrame {
    let mut df = DataFrame::new();
    df.add_column("key", StringColumn::new(strings(&["A", "B", "A", "B", "C"])))
        .unwrap();
    df.add_column("num", Int64Column::new(vec![1, 2, 1, 2, 3])).unwrap();
    df.add_column("values", Int64Column::new(vec![10, 20, 30, 40, 50]))
        .unwrap();
    df
}

#[test]
fn test_grouping_creation() {
    let df = sample();
    let grouping = Grouping::new(&df, &"key".into(), true).unwrap();

    assert_eq!(grouping.ngroups(), 3); // A, B, C
    assert_eq!(grouping.group_sizes(), vec![2, 2, 1]);
}

#[test]
fn test_grouping_sum() {
    let df = sample();
    let grouping = Grouping::new(&df, &"key".into(), true).unwrap();

    let sums = grouping
        .aggregate(df.column("values").unwrap(), &AggFunc::Sum.into())
        .unwrap();
    assert_eq!(sums, vec![Scalar::Int64(40), Scalar::Int64(60), Scalar::Int64(50)]);
}

#[test]
fn test_grouping_mean() {
    let df = sample();
    let grouping = Grouping::new(&df, &"key".into(), true).unwrap();

    let means = grouping
        .aggregate(df.column("values").unwrap(), &"mean".into())
        .unwrap();
    assert_eq!(
        means,
        vec![Scalar::Float64(20.0), Scalar::Float64(30.0), Scalar::Float64(50.0)]
    );
}

#[test]
fn test_grouping_numeric_keys() {
    let df = sample();
    let grouping = Grouping::new(&df, &"num".into(), true).unwrap();

    assert_eq!(grouping.ngroups(), 3); // 1, 2, 3
    assert_eq!(grouping.keys()[2].0, vec![Scalar::Int64(3)]);
}

#[test]
fn test_grouping_multiple_keys() {
    let mut df = DataFrame::new();
    df.add_column("a", StringColumn::new(strings(&["x", "x", "y", "x"])))
        .unwrap();
    df.add_column("b", Int64Column::new(vec![1, 2, 1, 1])).unwrap();
    df.add_column("v", Float64Column::new(vec![1.0, 2.0, 3.0, 4.0]))
        .unwrap();

    let grouping = Grouping::new(&df, &["a", "b"].into(), true).unwrap();
    assert_eq!(grouping.ngroups(), 3);

    let out = grouping
        .transform(df.column("v").unwrap(), &AggFunc::Sum.into())
        .unwrap();
    assert_eq!(
        out.scalars().unwrap(),
        vec![
            Scalar::Float64(5.0),
            Scalar::Float64(2.0),
            Scalar::Float64(3.0),
            Scalar::Float64(5.0)
        ]
    );
}

#[test]
fn test_grouping_derived_key() {
    let df = sample();
    let parity = GroupKeySpec::derived(|row| {
        let v = row.get("values")?.as_i64().unwrap_or_default();
        Ok(Scalar::Boolean(v % 20 == 0))
    });

    let grouping = Grouping::new(&df, &parity, true).unwrap();
    assert_eq!(grouping.ngroups(), 2);
    assert_eq!(grouping.group_sizes(), vec![3, 2]);
}

#[test]
fn test_custom_aggregation() {
    let df = sample();
    let grouping = Grouping::new(&df, &"key".into(), true).unwrap();
    let range = Aggregation::custom("range", |values| {
        let nums: Vec<i64> = values.iter().filter_map(Scalar::as_i64).collect();
        match (nums.iter().min(), nums.iter().max()) {
            (Some(lo), Some(hi)) => Ok(Scalar::Int64(hi - lo)),
            _ => Ok(Scalar::Null),
        }
    });

    let spans = grouping
        .aggregate(df.column("values").unwrap(), &range)
        .unwrap();
    assert_eq!(spans, vec![Scalar::Int64(20), Scalar::Int64(20), Scalar::Int64(0)]);
}
