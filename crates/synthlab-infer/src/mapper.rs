use synthlab_core::ColumnInfo;

use crate::options::InferOptions;
use crate::profile::ColumnProfile;

/// Classify one profiled column.
pub(crate) fn map_column(name: &str, profile: &ColumnProfile, opts: &InferOptions) -> ColumnInfo {
    let info = classify(name, profile, opts);
    info.with_missing_rate(profile.missing_rate())
}

fn classify(name: &str, profile: &ColumnProfile, opts: &InferOptions) -> ColumnInfo {
    let forced = opts.identifier_override(name);

    if forced == Some(true) {
        return identifier(name, profile);
    }

    if profile.all_null() {
        return ColumnInfo::categorical(name, Vec::<String>::new());
    }

    let distinct = profile.distinct.len();
    if distinct <= opts.categorical_threshold {
        return ColumnInfo::categorical(name, profile.distinct.iter().cloned());
    }

    if forced.is_none() && opts.detect_identifiers && looks_like_identifier(profile, opts) {
        return identifier(name, profile);
    }

    match profile.bounds() {
        Some((min, max)) if profile.all_whole() => ColumnInfo::integer(name, min, max),
        Some((min, max)) => ColumnInfo::float(name, min, max),
        None => ColumnInfo::categorical(name, profile.distinct.iter().cloned()),
    }
}

fn looks_like_identifier(profile: &ColumnProfile, opts: &InferOptions) -> bool {
    match profile.numeric {
        Some(_) => profile.all_whole() && profile.unique_ratio() > opts.identifier_unique_ratio,
        None => profile.distinct.len() == profile.non_null(),
    }
}

fn identifier(name: &str, profile: &ColumnProfile) -> ColumnInfo {
    match profile.bounds() {
        Some((min, max)) if profile.all_whole() => {
            let mut info = ColumnInfo::identifier(name, min as i64);
            info.min = Some(min);
            info.max = Some(max);
            info
        }
        _ => {
            let mut info = ColumnInfo::identifier(name, 1);
            info.start = None;
            info
        }
    }
}
