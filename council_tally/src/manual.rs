/*!

This is the long-form manual for `council_tally` and `sctally`.

## The two tracks

Every position label in the raw vote counts belongs to one of two election
tracks:

* the school-wide track (SSC): a fixed slate of positions that are not tied
  to any college, such as `President`, `Vice President` and `Senator`.
* the local track (LSC): positions qualified by a college. Most of these
  are written as `<position> - <college>`, for example `Governor - CAFA`.
  The multi-seat board member races are written as
  `Board Member - <degree program>` instead; the owning college is found by
  looking the program up in the configured program table.

Labels that fit none of these shapes, and board member labels whose program
is missing from the table, are dropped from the tally and reported in the
drop counters of the run. They are never guessed into a bucket.

## Input formats

The following formats are supported by `sctally`:
* `json` (default) the export of the vote-recording subsystem
* `csv` plain comma separated values
* `xlsx` an Excel workbook

### `json`

Either a bare array of records or an object with a `voteCounts` array:

```text
{
  "voteCounts": [
    { "position": "Senator", "candidate": "Alice", "votes": 120 },
    { "position": "Governor - CAFA", "candidate": "Bob", "votes": "45" },
    { "position": "Senator", "candidate": "Abstain", "votes": 3 }
  ]
}
```

The `votes` field may be a number or numeric text. A value that does not
parse as a non-negative integer drops that record only, not the run.

### `csv`

Three columns: `position,candidate,votes`. A header row is recognized when
the first column of the first line reads `position`.

```text
position,candidate,votes
Senator,Alice,120
Governor - CAFA,Bob,45
Senator,Abstain,3
```

### `xlsx`

The same three columns in the first worksheet of an Excel workbook, with
the first row as headers. Use `--excel-worksheet-name` to select a
different worksheet.

## Configuration

The scope configuration is a JSON artifact:

```text
{
  "sscPositions": ["President", "Vice President", "Senator"],
  "colleges": [
    {
      "college": "CAFA",
      "programs": [
        "Bachelor of Science in Architecture",
        "Bachelor in Fine Arts"
      ]
    },
    {
      "college": "CBEA",
      "programs": [
        "Bachelor of Science in Accountancy/Accounting Information System"
      ]
    }
  ]
}
```

* `sscPositions` (optional): the school-wide slate. Defaults to
  `President`, `Vice President`, `Senator`.
* `colleges`: the program table, one entry per college with its ordered
  list of degree programs. The table mirrors the institution's curricular
  structure and should be versioned with the election; a program listed
  under two colleges is rejected at startup.

Running without `--config` uses the default slate and an empty program
table, in which case board member races cannot resolve.

## Output

The summary is a JSON document:

```text
{
  "droppedRecords": 0,
  "results": {
    "lsc": { "<college>": { "<position>": <entry>, ... }, ... },
    "ssc": { "<position>": <entry>, ... }
  },
  "success": true
}
```

where each entry reads:

```text
{
  "abstain": { "percentage": 4.0, "votes": 5 },
  "candidates": [ { "name": "...", "percentage": 96.0, "votes": 120 }, ... ],
  "totalVotes": 125
}
```

Candidates are ordered by descending vote count; candidates with equal
counts keep the order in which they first appeared in the input.
Percentages are shares of `totalVotes` and are not rounded; formatting is
left to the presentation layer. A position whose total is zero reports zero
for every percentage. When the run fails (unreadable input, invalid
configuration), the program prints `{"success": false}` instead and exits
nonzero; no partial results are ever emitted.

*/
