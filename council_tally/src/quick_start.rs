/*!

# Quick start

This example runs the aggregation end to end on a small election with one
school-wide race and one local race.

**Collecting the counts** Export the raw vote counts from the recording
system into a file `counts.json`:

```text
[
  { "position": "Senator", "candidate": "Alice", "votes": 10 },
  { "position": "Senator", "candidate": "Bob", "votes": 7 },
  { "position": "Senator", "candidate": "Abstain", "votes": 3 },
  { "position": "Governor - CAFA", "candidate": "Carol", "votes": 12 }
]
```

**Describing the scopes** Write the scope configuration `scopes.json`. For
this election the default school-wide slate is fine and there are no board
member races, so a single college entry with no programs is enough:

```text
{
  "colleges": [
    { "college": "CAFA", "programs": [] }
  ]
}
```

**Running the tabulation**

```bash
sctally --config scopes.json --input counts.json
```

The summary is printed to the standard output (keys are serialized in
sorted order):

```text
{
  "droppedRecords": 0,
  "results": {
    "lsc": {
      "CAFA": {
        "Governor": {
          "abstain": { "percentage": 0.0, "votes": 0 },
          "candidates": [
            { "name": "Carol", "percentage": 100.0, "votes": 12 }
          ],
          "totalVotes": 12
        }
      }
    },
    "ssc": {
      "Senator": {
        "abstain": { "percentage": 15.0, "votes": 3 },
        "candidates": [
          { "name": "Alice", "percentage": 50.0, "votes": 10 },
          { "name": "Bob", "percentage": 35.0, "votes": 7 }
        ],
        "totalVotes": 20
      }
    }
  },
  "success": true
}
```

Use `--out results.json` to write the summary to a file instead, and
`--verbose` to see the pipeline narrate each stage, including any dropped
records.

**Using the library** The same run, programmatically:

```
use council_tally::{Builder, ProgramTable, ScopeConfig};
# use council_tally::TallyErrors;

let scope = ScopeConfig::with_programs(ProgramTable::empty());
let mut builder = Builder::new(&scope)?;
builder.add_record("Senator", "Alice", 10);
builder.add_record("Senator", "Bob", 7);
builder.add_record("Senator", "Abstain", 3);

let outcome = builder.results();
let senator = &outcome.results.all_ssc()["Senator"];
assert_eq!(senator.total_votes, 20);
assert_eq!(senator.candidates[0].percentage, 50.0);
# Ok::<(), TallyErrors>(())
```

If you are loading counts from a file in one of the supported formats,
check the input documentation in the [manual](../manual/index.html).

*/
