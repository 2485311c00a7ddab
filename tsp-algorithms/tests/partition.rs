use std::collections::HashSet;

use tsp_algorithms::{check_size, partition, Partition, MAX_CITIES};
use tsp_structs::{core::*, error::TspError};

fn cities(n: usize) -> Vec<City> {
    (0..n)
        .map(|i| City::new(format!("C{}", i), i as i32, (i * i) as i32))
        .collect()
}

#[test]
fn test_sub_problems() {
    let cities = cities(6);
    let sub_problems = match partition(&cities, MAX_CITIES) {
        Partition::SubProblems(sub_problems) => sub_problems,
        other => panic!("unexpected partition {:?}", other),
    };
    assert_eq!(sub_problems.len(), 5);
    let non_origin: HashSet<&City> = cities[1..].iter().collect();
    for (k, sub_problem) in sub_problems.iter().enumerate() {
        assert_eq!(sub_problem.origin, cities[0]);
        assert_eq!(sub_problem.fixed_second, cities[k + 1]);
        assert_eq!(sub_problem.num_cities(), 6);
        let mut covered: HashSet<&City> = sub_problem.remaining.iter().collect();
        covered.insert(&sub_problem.fixed_second);
        assert_eq!(covered, non_origin);
    }
    // Remaining cities keep input order.
    assert_eq!(
        sub_problems[1]
            .remaining
            .iter()
            .map(|c| c.name.as_str())
            .collect::<Vec<_>>(),
        vec!["C1", "C3", "C4", "C5"]
    );
}

#[test]
fn test_two_cities() {
    let cities = cities(2);
    let sub_problems = partition(&cities, MAX_CITIES).into_sub_problems().unwrap();
    assert_eq!(sub_problems.len(), 1);
    assert!(sub_problems[0].remaining.is_empty());
}

#[test]
fn test_size_limits() {
    assert_eq!(
        partition(&cities(1), MAX_CITIES),
        Partition::Insufficient { num_cities: 1 }
    );
    assert_eq!(
        partition(&cities(14), MAX_CITIES),
        Partition::Infeasible {
            num_cities: 14,
            max_cities: 13
        }
    );
    assert_eq!(
        partition(&cities(14), MAX_CITIES).into_sub_problems(),
        Err(TspError::InfeasibleSize {
            num_cities: 14,
            max_cities: 13
        })
    );
    assert!(matches!(
        partition(&cities(13), MAX_CITIES),
        Partition::SubProblems(s) if s.len() == 12
    ));
    assert!(matches!(
        partition(&cities(5), 4),
        Partition::Infeasible { .. }
    ));

    assert_eq!(check_size(0, MAX_CITIES), Err(TspError::InsufficientCities { num_cities: 0 }));
    assert_eq!(check_size(2, MAX_CITIES), Ok(()));
    assert_eq!(check_size(13, MAX_CITIES), Ok(()));
}
