use serde::{Deserialize, Serialize};

use super::error::CatalogueError;

/// Стратегия выдачи новых идентификаторов.
///
/// Файловое хранилище выдаёт `max + 1`, удалённое (версионируемое)
/// выдаёт значение на основе текущего времени в миллисекундах.
/// В обоих случаях результат строго больше всех существующих id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdAllocator {
    Sequential,
    Timestamp,
}

impl IdAllocator {
    /// `now_millis` is only consulted by [`IdAllocator::Timestamp`].
    ///
    /// Если среди существующих уже есть `i64::MAX`, свободного id нет.
    pub fn next_id<I>(self, existing: I, now_millis: i64) -> Result<i64, CatalogueError>
    where
        I: IntoIterator<Item = i64>,
    {
        let max = existing.into_iter().fold(0, i64::max);
        let next = max
            .checked_add(1)
            .ok_or_else(|| CatalogueError::invalid("id space exhausted"))?;
        Ok(match self {
            IdAllocator::Sequential => next,
            IdAllocator::Timestamp => now_millis.max(next),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequential() {
        assert_eq!(IdAllocator::Sequential.next_id(Vec::new(), 0), Ok(1));
        assert_eq!(IdAllocator::Sequential.next_id(vec![3, 7, 2], 0), Ok(8));
        // negative ids never push the next id below 1
        assert_eq!(IdAllocator::Sequential.next_id(vec![-5], 0), Ok(1));
    }

    #[test]
    fn test_timestamp_never_collides() {
        let now = 1_700_000_000_000;
        assert_eq!(IdAllocator::Timestamp.next_id(vec![1, 2], now), Ok(now));
        // clock behind the largest id
        assert_eq!(
            IdAllocator::Timestamp.next_id(vec![now + 10], now),
            Ok(now + 11)
        );
    }

    #[test]
    fn test_exhausted_id_space_is_an_error() {
        for allocator in [IdAllocator::Sequential, IdAllocator::Timestamp] {
            let err = allocator.next_id(vec![1, i64::MAX], 0).unwrap_err();
            assert!(err.is_validation());
            assert_eq!(err.to_string(), "id space exhausted");
        }
    }
}
