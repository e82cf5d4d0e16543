//! Compression parameters.
//!
//! A [`Parameters`] set maps each [`Tunable`] to an integer, the way zstd's
//! own parameter API does. The whole set is pushed into the compression
//! context every time one value changes.
use std::collections::BTreeMap;
use std::convert::TryFrom;

use zstd_safe::{CCtx, CParameter, Strategy};

use crate::error::{Error, Result};
use crate::DEFAULT_COMPRESSION_LEVEL;

/// Identifies one compression tunable.
///
/// Values of `0` generally mean "let zstd pick", same as in the C library.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Tunable {
    /// Compression level. Negative levels trade ratio for speed.
    CompressionLevel,
    /// Maximum back-reference distance, as a power of 2.
    WindowLog,
    /// Size of the initial probe table, as a power of 2.
    HashLog,
    /// Size of the multi-probe search table, as a power of 2.
    ChainLog,
    /// Number of search attempts, as a power of 2.
    SearchLog,
    /// Minimum size of searched matches.
    MinMatch,
    /// Strategy-dependent length target.
    TargetLength,
    /// Match finder, from `1` (fast) to `9` (btultra2).
    Strategy,
    /// Long distance matching (`0` or `1`).
    EnableLongDistanceMatching,
    /// Size of the long distance matching table, as a power of 2.
    LdmHashLog,
    /// Minimum match size for long distance matching.
    LdmMinMatch,
    /// Log size of each long distance matching bucket.
    LdmBucketSizeLog,
    /// Frequency of inserting into the long distance matching table.
    LdmHashRateLog,
    /// Write the content size into the frame header (`0` or `1`).
    ContentSizeFlag,
    /// Append a checksum of the content to the frame (`0` or `1`).
    ChecksumFlag,
    /// Write the dictionary id into the frame header (`0` or `1`).
    DictIdFlag,
    /// Number of worker threads. Needs the `zstdmt` feature when non-zero.
    NbWorkers,
    /// Size of a compression job, for multi-threaded compression.
    JobSize,
    /// Overlap between jobs, as a fraction of the window size.
    OverlapSizeLog,
}

impl Tunable {
    /// Translates a value into the matching zstd parameter.
    ///
    /// Only checks that the value is representable; ranges are checked by
    /// zstd when the parameter is applied.
    fn to_cparameter(self, value: i32) -> Result<CParameter> {
        let unsigned = || {
            u32::try_from(value).map_err(|_| Error::Configuration {
                tunable: self,
                value,
                reason: "value must not be negative",
            })
        };
        let flag = || match value {
            0 => Ok(false),
            1 => Ok(true),
            _ => Err(Error::Configuration {
                tunable: self,
                value,
                reason: "value must be 0 or 1",
            }),
        };

        Ok(match self {
            Tunable::CompressionLevel => CParameter::CompressionLevel(value),
            Tunable::WindowLog => CParameter::WindowLog(unsigned()?),
            Tunable::HashLog => CParameter::HashLog(unsigned()?),
            Tunable::ChainLog => CParameter::ChainLog(unsigned()?),
            Tunable::SearchLog => CParameter::SearchLog(unsigned()?),
            Tunable::MinMatch => CParameter::MinMatch(unsigned()?),
            Tunable::TargetLength => CParameter::TargetLength(unsigned()?),
            Tunable::Strategy => CParameter::Strategy(strategy(value).ok_or(
                Error::Configuration {
                    tunable: self,
                    value,
                    reason: "unknown strategy",
                },
            )?),
            Tunable::EnableLongDistanceMatching => {
                CParameter::EnableLongDistanceMatching(flag()?)
            }
            Tunable::LdmHashLog => CParameter::LdmHashLog(unsigned()?),
            Tunable::LdmMinMatch => CParameter::LdmMinMatch(unsigned()?),
            Tunable::LdmBucketSizeLog => {
                CParameter::LdmBucketSizeLog(unsigned()?)
            }
            Tunable::LdmHashRateLog => CParameter::LdmHashRateLog(unsigned()?),
            Tunable::ContentSizeFlag => CParameter::ContentSizeFlag(flag()?),
            Tunable::ChecksumFlag => CParameter::ChecksumFlag(flag()?),
            Tunable::DictIdFlag => CParameter::DictIdFlag(flag()?),
            Tunable::NbWorkers => CParameter::NbWorkers(unsigned()?),
            Tunable::JobSize => CParameter::JobSize(unsigned()?),
            Tunable::OverlapSizeLog => CParameter::OverlapSizeLog(unsigned()?),
        })
    }
}

fn strategy(value: i32) -> Option<Strategy> {
    Some(match value {
        1 => Strategy::ZSTD_fast,
        2 => Strategy::ZSTD_dfast,
        3 => Strategy::ZSTD_greedy,
        4 => Strategy::ZSTD_lazy,
        5 => Strategy::ZSTD_lazy2,
        6 => Strategy::ZSTD_btlazy2,
        7 => Strategy::ZSTD_btopt,
        8 => Strategy::ZSTD_btultra,
        9 => Strategy::ZSTD_btultra2,
        _ => return None,
    })
}

/// A set of compression parameters.
///
/// Starts with only the compression level, at [`DEFAULT_COMPRESSION_LEVEL`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Parameters {
    values: BTreeMap<Tunable, i32>,
}

impl Default for Parameters {
    fn default() -> Self {
        Parameters::new()
    }
}

impl Parameters {
    /// Creates a parameter set with the baseline compression level.
    pub fn new() -> Self {
        let mut values = BTreeMap::new();
        values.insert(Tunable::CompressionLevel, DEFAULT_COMPRESSION_LEVEL);
        Parameters { values }
    }

    /// Builder-style variant of [`Parameters::set`].
    pub fn with(mut self, tunable: Tunable, value: i32) -> Result<Self> {
        self.set(tunable, value)?;
        Ok(self)
    }

    /// Writes a value, returning the previous one.
    ///
    /// Values that cannot be represented for this tunable are rejected and
    /// leave the set unchanged.
    pub fn set(&mut self, tunable: Tunable, value: i32) -> Result<Option<i32>> {
        tunable.to_cparameter(value)?;
        Ok(self.values.insert(tunable, value))
    }

    /// Returns the value last written for this tunable, if any.
    pub fn get(&self, tunable: Tunable) -> Option<i32> {
        self.values.get(&tunable).copied()
    }

    /// Iterates over every explicitly written tunable.
    pub fn iter(&self) -> impl Iterator<Item = (Tunable, i32)> + '_ {
        self.values.iter().map(|(&tunable, &value)| (tunable, value))
    }

    /// Puts back a value returned by [`Parameters::set`].
    pub(crate) fn restore(&mut self, tunable: Tunable, previous: Option<i32>) {
        match previous {
            Some(value) => self.values.insert(tunable, value),
            None => self.values.remove(&tunable),
        };
    }

    /// Pushes every entry into the given context.
    pub(crate) fn apply(&self, cctx: &mut CCtx<'_>) -> Result<()> {
        for (tunable, value) in self.iter() {
            let parameter = tunable.to_cparameter(value)?;
            cctx.set_parameter(parameter).map_err(|code| {
                log::warn!("zstd rejected {:?}={}", tunable, value);
                Error::Configuration {
                    tunable,
                    value,
                    reason: zstd_safe::get_error_name(code),
                }
            })?;
        }
        log::debug!("applied {} compression parameters", self.values.len());
        Ok(())
    }
}
