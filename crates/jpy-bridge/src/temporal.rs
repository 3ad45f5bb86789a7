//! Temporal Bridge
//!
//! `java.time.LocalDate` ↔ `datetime.date`, `java.time.LocalTime` ↔
//! `datetime.time`, and `java.time.LocalDateTime` ↔
//! `datetime.datetime`.
//!
//! Java sub-second precision is the nanosecond; CPython's is the
//! microsecond. Crossing to Python truncates nanoseconds to whole
//! microseconds; crossing back multiplies by 1000, so a value that
//! originated in Python round-trips exactly.
//!
//! A `LocalDateTime` is never read field-by-field: it is decomposed
//! through `toLocalDate()`/`toLocalTime()` and recomposed through the
//! static `LocalDateTime.of(date, time)`, with the method handles
//! coming from the [`ClassCache`].

use jpy_jvm::{JRef, Jvm};

use crate::class_cache::{ClassCache, WellKnownClass};
use crate::error::{BridgeError, BridgeResult};
use crate::py_types::{PyDate, PyDateTime, PyTime, PyValue};

const NANOS_PER_MICRO: u32 = 1_000;

/// `LocalDate` → `datetime.date`
pub fn py_date_from_jdate(jvm: &Jvm, obj: &JRef) -> BridgeResult<PyValue> {
    let (year, month, day) = jvm.local_date_fields(obj)?;
    Ok(PyValue::Date(PyDate { year, month, day }))
}

/// `datetime.date` → `LocalDate`
pub fn jdate_from_py_date(jvm: &Jvm, date: &PyDate) -> JRef {
    jvm.new_local_date(date.year, date.month, date.day)
}

/// `LocalTime` → `datetime.time`, truncating nanoseconds to microseconds
pub fn py_time_from_jtime(jvm: &Jvm, obj: &JRef) -> BridgeResult<PyValue> {
    let (hour, minute, second, nano) = jvm.local_time_fields(obj)?;
    Ok(PyValue::Time(PyTime {
        hour,
        minute,
        second,
        microsecond: nano / NANOS_PER_MICRO,
    }))
}

/// `datetime.time` → `LocalTime`
pub fn jtime_from_py_time(jvm: &Jvm, time: &PyTime) -> JRef {
    jvm.new_local_time(
        time.hour,
        time.minute,
        time.second,
        time.microsecond * NANOS_PER_MICRO,
    )
}

/// `LocalDateTime` → `datetime.datetime`, decomposed through the cached
/// `toLocalDate()`/`toLocalTime()` handles
pub fn py_datetime_from_jdatetime(
    jvm: &Jvm,
    cache: &ClassCache,
    obj: &JRef,
) -> BridgeResult<PyValue> {
    let date = jvm
        .call_object_method(obj, cache.to_local_date_mid()?)?
        .ok_or_else(|| BridgeError::null_object("LocalDateTime.toLocalDate()"))?;
    let time = jvm
        .call_object_method(obj, cache.to_local_time_mid()?)?
        .ok_or_else(|| BridgeError::null_object("LocalDateTime.toLocalTime()"))?;

    let (year, month, day) = jvm.local_date_fields(&date)?;
    let (hour, minute, second, nano) = jvm.local_time_fields(&time)?;
    Ok(PyValue::DateTime(PyDateTime {
        date: PyDate { year, month, day },
        time: PyTime {
            hour,
            minute,
            second,
            microsecond: nano / NANOS_PER_MICRO,
        },
    }))
}

/// `datetime.datetime` → `LocalDateTime`, recomposed through the cached
/// static `LocalDateTime.of(date, time)` handle
pub fn jdatetime_from_py_datetime(
    jvm: &Jvm,
    cache: &ClassCache,
    value: &PyDateTime,
) -> BridgeResult<JRef> {
    let date = jdate_from_py_date(jvm, &value.date);
    let time = jtime_from_py_time(jvm, &value.time);
    let ldt_class = cache.class(WellKnownClass::LocalDateTime)?;
    jvm.call_static_object_method(ldt_class, cache.ldt_of_mid()?, &[Some(date), Some(time)])?
        .ok_or_else(|| BridgeError::null_object("LocalDateTime.of(date, time)"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn populated() -> (Jvm, ClassCache) {
        let jvm = Jvm::new();
        let cache = ClassCache::new();
        cache.populate(&jvm).unwrap();
        (jvm, cache)
    }

    #[test]
    fn date_round_trip() {
        let jvm = Jvm::new();
        let date = PyDate {
            year: 2024,
            month: 2,
            day: 29,
        };
        let jdate = jdate_from_py_date(&jvm, &date);
        assert_eq!(py_date_from_jdate(&jvm, &jdate).unwrap(), PyValue::Date(date));
    }

    #[test]
    fn time_nanos_truncate_to_micros() {
        let jvm = Jvm::new();
        let jtime = jvm.new_local_time(23, 59, 59, 123_456_789);
        let got = py_time_from_jtime(&jvm, &jtime).unwrap();
        assert_eq!(
            got,
            PyValue::Time(PyTime {
                hour: 23,
                minute: 59,
                second: 59,
                microsecond: 123_456,
            })
        );
    }

    #[test]
    fn python_born_time_round_trips_exactly() {
        let jvm = Jvm::new();
        let time = PyTime {
            hour: 6,
            minute: 30,
            second: 0,
            microsecond: 999_999,
        };
        let jtime = jtime_from_py_time(&jvm, &time);
        assert_eq!(py_time_from_jtime(&jvm, &jtime).unwrap(), PyValue::Time(time));
    }

    #[test]
    fn datetime_compose_decompose() {
        let (jvm, cache) = populated();
        let value = PyDateTime {
            date: PyDate {
                year: 1999,
                month: 12,
                day: 31,
            },
            time: PyTime {
                hour: 23,
                minute: 59,
                second: 59,
                microsecond: 500_000,
            },
        };
        let jdt = jdatetime_from_py_datetime(&jvm, &cache, &value).unwrap();
        assert_eq!(
            py_datetime_from_jdatetime(&jvm, &cache, &jdt).unwrap(),
            PyValue::DateTime(value)
        );
        cache.teardown(&jvm);
    }

    #[test]
    fn wrong_receiver_is_an_error() {
        let (jvm, cache) = populated();
        let not_a_date = jvm.new_integer(5);
        assert!(py_date_from_jdate(&jvm, &not_a_date).is_err());
        assert!(py_datetime_from_jdatetime(&jvm, &cache, &not_a_date).is_err());
        cache.teardown(&jvm);
    }
}
